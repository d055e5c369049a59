//! Admin CLI over the CampusDesk core services.
//!
//! # Responsibility
//! - Drive every admin screen action from a terminal against the configured
//!   backends.
//! - Print one line per record; exit non-zero on any failure.

use campusdesk_core::{
    core_version, default_log_level, init_logging, ping, AdminConfig, AdminSession, CollegeInfo,
    Faculty, FacultyFilter, MediaFile, Notice, NoticeFilter, NoticePriority, TimetableEntry,
    TimetableFilter, Weekday,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "campusdesk")]
#[command(about = "CampusDesk college content administration", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "campusdesk.toml")]
    config: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check core linkage without touching any backend
    Ping,
    /// Home screen banners
    Banners {
        #[command(subcommand)]
        action: BannerAction,
    },
    /// Faculty directory
    Faculty {
        #[command(subcommand)]
        action: FacultyAction,
    },
    /// Notice board
    Notices {
        #[command(subcommand)]
        action: NoticeAction,
    },
    /// Weekly class timetable
    Timetable {
        #[command(subcommand)]
        action: TimetableAction,
    },
    /// Photo gallery
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
    /// College profile
    CollegeInfo {
        #[command(subcommand)]
        action: CollegeInfoAction,
    },
}

#[derive(Subcommand)]
enum BannerAction {
    List,
    Upload { file: PathBuf },
    Delete { id: String },
}

#[derive(Subcommand)]
enum FacultyAction {
    List {
        /// Search text over name, email, department and designation
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        department: Option<String>,
        #[arg(long)]
        include_inactive: bool,
    },
    Add {
        #[command(flatten)]
        fields: FacultyFields,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: FacultyFields,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    Activate { id: String },
    Deactivate { id: String },
    Delete { id: String },
}

#[derive(Args)]
struct FacultyFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    designation: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    qualification: String,
    #[arg(long, default_value = "")]
    experience: String,
    #[arg(long, default_value = "")]
    specialization: String,
    #[arg(long, default_value = "")]
    joining_date: String,
}

#[derive(Subcommand)]
enum NoticeAction {
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        /// Low, Medium, High or Urgent
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        active_only: bool,
    },
    Add {
        #[command(flatten)]
        fields: NoticeFields,
        /// PDF attachment
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: NoticeFields,
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    Activate { id: String },
    Deactivate { id: String },
    Delete { id: String },
}

#[derive(Args)]
struct NoticeFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, default_value = "General")]
    category: String,
    #[arg(long, default_value = "Medium")]
    priority: String,
    #[arg(long, default_value = "")]
    publish_date: String,
    #[arg(long, default_value = "")]
    published_by: String,
}

#[derive(Subcommand)]
enum TimetableAction {
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        day: Option<String>,
    },
    Add {
        #[command(flatten)]
        fields: TimetableFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: TimetableFields,
    },
    /// Hides the entry; the document is kept
    Delete { id: String },
}

#[derive(Args)]
struct TimetableFields {
    #[arg(long)]
    year: String,
    #[arg(long)]
    branch: String,
    #[arg(long)]
    day: String,
    #[arg(long)]
    time_slot: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    teacher: String,
    #[arg(long, default_value = "")]
    subject_code: String,
    #[arg(long, default_value = "")]
    room: String,
}

#[derive(Subcommand)]
enum GalleryAction {
    List,
    Upload {
        file: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },
    Caption { id: String, caption: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum CollegeInfoAction {
    Show,
    Set {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long, default_value = "")]
        about: String,
        #[arg(long)]
        established_year: Option<i64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("campusdesk_core ping={}", ping());
        println!("campusdesk_core version={}", core_version());
        return Ok(());
    }

    let config = AdminConfig::load(&cli.config).map_err(|err| err.to_string())?;
    let mut session = AdminSession::from_config(&config).map_err(|err| err.to_string())?;
    info!("event=cli_start module=cli status=ok");

    match cli.command {
        Command::Ping => Ok(()),
        Command::Banners { action } => run_banners(&mut session, action),
        Command::Faculty { action } => run_faculty(&mut session, action),
        Command::Notices { action } => run_notices(&mut session, action),
        Command::Timetable { action } => run_timetable(&mut session, action),
        Command::Gallery { action } => run_gallery(&mut session, action),
        Command::CollegeInfo { action } => run_college_info(&mut session, action),
    }
}

fn run_banners(session: &mut AdminSession, action: BannerAction) -> Result<(), String> {
    let service = &mut session.banners;
    match action {
        BannerAction::List => {
            for banner in service.load().map_err(|err| err.to_string())? {
                println!("{}\t{}\t{}", banner.id, banner.uploaded_at, banner.image_url);
            }
        }
        BannerAction::Upload { file } => {
            let banner = service.upload(&read_file(&file)?).map_err(|err| err.to_string())?;
            println!("uploaded {} {}", banner.id, banner.image_url);
        }
        BannerAction::Delete { id } => {
            service.delete(&id).map_err(|err| err.to_string())?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn run_faculty(session: &mut AdminSession, action: FacultyAction) -> Result<(), String> {
    let service = &mut session.faculty;
    match action {
        FacultyAction::List {
            query,
            department,
            include_inactive,
        } => {
            service.load(include_inactive).map_err(|err| err.to_string())?;
            let filter = FacultyFilter {
                query,
                department,
                include_inactive,
            };
            for member in service.filtered(&filter) {
                println!(
                    "{}\t{}\t{}\t{}\t{}{}",
                    member.id,
                    member.name,
                    member.department,
                    member.designation,
                    member.email,
                    if member.is_active { "" } else { "\t(inactive)" }
                );
            }
        }
        FacultyAction::Add { fields, photo } => {
            let photo = photo.as_deref().map(read_file).transpose()?;
            let member = service
                .create(fields.apply(Faculty::default()), photo.as_ref())
                .map_err(|err| err.to_string())?;
            println!("created {}", member.id);
        }
        FacultyAction::Update { id, fields, photo } => {
            let photo = photo.as_deref().map(read_file).transpose()?;
            service.load(true).map_err(|err| err.to_string())?;
            let existing = service
                .members()
                .iter()
                .find(|member| member.id == id)
                .cloned()
                .ok_or_else(|| format!("faculty not found: {id}"))?;
            let member = service
                .update(fields.apply(existing), photo.as_ref())
                .map_err(|err| err.to_string())?;
            println!("updated {}", member.id);
        }
        FacultyAction::Activate { id } => {
            service.set_active(&id, true).map_err(|err| err.to_string())?;
            println!("activated {id}");
        }
        FacultyAction::Deactivate { id } => {
            service.set_active(&id, false).map_err(|err| err.to_string())?;
            println!("deactivated {id}");
        }
        FacultyAction::Delete { id } => {
            service.delete(&id).map_err(|err| err.to_string())?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

impl FacultyFields {
    /// Overlays the edited fields; id, photo and active flag stay as in `base`.
    fn apply(self, base: Faculty) -> Faculty {
        Faculty {
            name: self.name,
            email: self.email,
            phone: self.phone,
            department: self.department,
            designation: self.designation,
            qualification: self.qualification,
            experience: self.experience,
            specialization: self.specialization,
            joining_date: self.joining_date,
            ..base
        }
    }
}

fn run_notices(session: &mut AdminSession, action: NoticeAction) -> Result<(), String> {
    let service = &mut session.notices;
    match action {
        NoticeAction::List {
            query,
            category,
            priority,
            active_only,
        } => {
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            service.load().map_err(|err| err.to_string())?;
            let filter = NoticeFilter {
                query,
                category,
                priority,
                active_only,
            };
            for notice in service.filtered(&filter) {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    notice.id,
                    notice.priority.as_str(),
                    notice.category,
                    notice.title,
                    if notice.has_attachment() { notice.attachment_url.as_str() } else { "-" }
                );
            }
        }
        NoticeAction::Add { fields, attachment } => {
            let attachment = attachment.as_deref().map(read_file).transpose()?;
            let notice = service
                .create(fields.apply(Notice::default())?, attachment.as_ref())
                .map_err(|err| err.to_string())?;
            println!("created {}", notice.id);
        }
        NoticeAction::Update {
            id,
            fields,
            attachment,
        } => {
            let attachment = attachment.as_deref().map(read_file).transpose()?;
            service.load().map_err(|err| err.to_string())?;
            let existing = service
                .notices()
                .iter()
                .find(|notice| notice.id == id)
                .cloned()
                .ok_or_else(|| format!("notice not found: {id}"))?;
            let notice = service
                .update(fields.apply(existing)?, attachment.as_ref())
                .map_err(|err| err.to_string())?;
            println!("updated {}", notice.id);
        }
        NoticeAction::Activate { id } => {
            service.set_active(&id, true).map_err(|err| err.to_string())?;
            println!("activated {id}");
        }
        NoticeAction::Deactivate { id } => {
            service.set_active(&id, false).map_err(|err| err.to_string())?;
            println!("deactivated {id}");
        }
        NoticeAction::Delete { id } => {
            service.delete(&id).map_err(|err| err.to_string())?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

impl NoticeFields {
    /// Overlays the edited fields; attachment and timestamps stay as in `base`.
    fn apply(self, base: Notice) -> Result<Notice, String> {
        Ok(Notice {
            title: self.title,
            description: self.description,
            category: self.category,
            priority: parse_priority(&self.priority)?,
            publish_date: self.publish_date,
            published_by: self.published_by,
            ..base
        })
    }
}

fn run_timetable(session: &mut AdminSession, action: TimetableAction) -> Result<(), String> {
    let service = &mut session.timetable;
    match action {
        TimetableAction::List {
            query,
            year,
            branch,
            day,
        } => {
            let day = day.as_deref().map(parse_day).transpose()?;
            service.load().map_err(|err| err.to_string())?;
            let filter = TimetableFilter {
                query,
                year,
                branch,
                day,
            };
            for entry in service.filtered(&filter) {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    entry.id,
                    entry.day.as_str(),
                    entry.time_slot,
                    entry.year,
                    entry.branch,
                    entry.subject,
                    entry.teacher_name,
                    entry.room_number
                );
            }
        }
        TimetableAction::Add { fields } => {
            let entry = service
                .create(fields.into_entry(String::new())?)
                .map_err(|err| err.to_string())?;
            println!("created {}", entry.id);
        }
        TimetableAction::Update { id, fields } => {
            let entry = service
                .update(fields.into_entry(id)?)
                .map_err(|err| err.to_string())?;
            println!("updated {}", entry.id);
        }
        TimetableAction::Delete { id } => {
            service.delete(&id).map_err(|err| err.to_string())?;
            println!("removed {id}");
        }
    }
    Ok(())
}

impl TimetableFields {
    fn into_entry(self, id: String) -> Result<TimetableEntry, String> {
        let mut entry = TimetableEntry::new(
            self.year,
            self.branch,
            parse_day(&self.day)?,
            self.time_slot,
            self.subject,
            self.teacher,
        );
        entry.id = id;
        entry.subject_code = self.subject_code;
        entry.room_number = self.room;
        Ok(entry)
    }
}

fn run_gallery(session: &mut AdminSession, action: GalleryAction) -> Result<(), String> {
    let service = &mut session.gallery;
    match action {
        GalleryAction::List => {
            for image in service.load().map_err(|err| err.to_string())? {
                println!("{}\t{}\t{}", image.id, image.image_url, image.caption);
            }
        }
        GalleryAction::Upload { file, caption } => {
            let image = service
                .upload(&read_file(&file)?, &caption)
                .map_err(|err| err.to_string())?;
            println!("uploaded {} {}", image.id, image.image_url);
        }
        GalleryAction::Caption { id, caption } => {
            service
                .update_caption(&id, &caption)
                .map_err(|err| err.to_string())?;
            println!("updated {id}");
        }
        GalleryAction::Delete { id } => {
            service.delete(&id).map_err(|err| err.to_string())?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn run_college_info(session: &mut AdminSession, action: CollegeInfoAction) -> Result<(), String> {
    let service = &mut session.college_info;
    match action {
        CollegeInfoAction::Show => match service.load().map_err(|err| err.to_string())? {
            Some(info) => {
                println!("name: {}", info.name);
                println!("address: {}", info.address);
                println!("phone: {}", info.phone);
                println!("email: {}", info.email);
                println!("website: {}", info.website);
                if let Some(year) = info.established_year {
                    println!("established: {year}");
                }
                println!("about: {}", info.about);
            }
            None => println!("college info not set"),
        },
        CollegeInfoAction::Set {
            name,
            address,
            phone,
            email,
            website,
            about,
            established_year,
        } => {
            service
                .save(CollegeInfo {
                    name,
                    address,
                    phone,
                    email,
                    website,
                    about,
                    established_year,
                    ..CollegeInfo::default()
                })
                .map_err(|err| err.to_string())?;
            println!("saved college info");
        }
    }
    Ok(())
}

fn read_file(path: &std::path::Path) -> Result<MediaFile, String> {
    MediaFile::from_path(path).map_err(|err| err.to_string())
}

fn parse_priority(value: &str) -> Result<NoticePriority, String> {
    NoticePriority::parse(value).ok_or_else(|| format!("unknown priority `{value}`"))
}

fn parse_day(value: &str) -> Result<Weekday, String> {
    Weekday::parse(value).ok_or_else(|| format!("unknown day `{value}`"))
}
