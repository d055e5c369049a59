//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per admin screen action to Dart via FRB.
//! - Flatten core records into plain DTOs and errors into envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Network-backed calls are async on the Dart side; FRB runs them on its
//!   worker pool, so they block only a worker thread.
//! - Each screen's service has its own lock. Sync filter calls read list
//!   snapshots and never wait on a network call.
//! - Every content call fails with `ok=false` until `configure` succeeds.

use campusdesk_core::service::banner_service::BannerService;
use campusdesk_core::service::college_info_service::CollegeInfoService;
use campusdesk_core::service::faculty_service::FacultyService;
use campusdesk_core::service::filter::distinct_values;
use campusdesk_core::service::gallery_service::GalleryService;
use campusdesk_core::service::notice_service::NoticeService;
use campusdesk_core::service::timetable_service::TimetableService;
use campusdesk_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AdminConfig, AdminSession, Banner, CollegeInfo, Faculty, FacultyFilter, GalleryImage,
    MediaFile, Notice, NoticeFilter, NoticePriority, SharedMedia, SharedStore, TimetableEntry,
    TimetableFilter, Weekday,
};
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

static SESSION: RwLock<Option<Arc<Session>>> = RwLock::new(None);

/// Configured services, one lock per screen, plus the loaded lists that sync
/// filter calls read.
struct Session {
    banners: Mutex<BannerService<SharedStore, SharedMedia>>,
    faculty: Mutex<FacultyService<SharedStore, SharedMedia>>,
    notices: Mutex<NoticeService<SharedStore, SharedMedia>>,
    timetable: Mutex<TimetableService<SharedStore>>,
    gallery: Mutex<GalleryService<SharedStore, SharedMedia>>,
    college_info: Mutex<CollegeInfoService<SharedStore>>,
    faculty_view: RwLock<Vec<Faculty>>,
    notice_view: RwLock<Vec<Notice>>,
    timetable_view: RwLock<Vec<TimetableEntry>>,
}

impl Session {
    fn open(config: &AdminConfig) -> Result<Self, String> {
        AdminSession::from_config(config)
            .map(Self::from_core)
            .map_err(|err| err.to_string())
    }

    fn from_core(core: AdminSession) -> Self {
        let AdminSession {
            banners,
            faculty,
            notices,
            timetable,
            gallery,
            college_info,
        } = core;
        Self {
            banners: Mutex::new(banners),
            faculty: Mutex::new(faculty),
            notices: Mutex::new(notices),
            timetable: Mutex::new(timetable),
            gallery: Mutex::new(gallery),
            college_info: Mutex::new(college_info),
            faculty_view: RwLock::new(Vec::new()),
            notice_view: RwLock::new(Vec::new()),
            timetable_view: RwLock::new(Vec::new()),
        }
    }

    fn publish_faculty(&self, members: &[Faculty]) {
        *self.faculty_view.write().unwrap_or_else(PoisonError::into_inner) = members.to_vec();
    }

    fn publish_notices(&self, notices: &[Notice]) {
        *self.notice_view.write().unwrap_or_else(PoisonError::into_inner) = notices.to_vec();
    }

    fn publish_timetable(&self, entries: &[TimetableEntry]) {
        *self.timetable_view.write().unwrap_or_else(PoisonError::into_inner) = entries.to_vec();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(view: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    view.read().unwrap_or_else(PoisonError::into_inner)
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or touched record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

fn list_envelope<T>(op: &str, result: Result<Vec<T>, String>) -> (bool, Vec<T>, String) {
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No records.".to_string()
            } else {
                format!("Loaded {} record(s).", items.len())
            };
            (true, items, message)
        }
        Err(err) => (false, Vec::new(), format!("{op} failed: {err}")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerItem {
    pub id: String,
    pub image_url: String,
    pub uploaded_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: String,
    pub image_url: String,
    pub caption: String,
    pub uploaded_at: i64,
}

/// Faculty form/list projection. An empty `id` means "create".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub designation: String,
    pub qualification: String,
    pub experience: String,
    pub specialization: String,
    pub image_url: String,
    pub joining_date: String,
    pub is_active: bool,
}

/// Notice form/list projection. An empty `id` means "create".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// `Low|Medium|High|Urgent`.
    pub priority: String,
    pub attachment_url: String,
    pub publish_date: String,
    pub published_by: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Timetable form/list projection. An empty `id` means "create".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableItem {
    pub id: String,
    pub year: String,
    pub branch: String,
    /// Full weekday name, e.g. `Monday`.
    pub day: String,
    pub time_slot: String,
    pub subject: String,
    pub subject_code: String,
    pub teacher_name: String,
    pub room_number: String,
    pub last_updated: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerListResponse {
    pub ok: bool,
    pub items: Vec<BannerItem>,
    pub message: String,
}

impl BannerListResponse {
    fn from_result(op: &str, result: Result<Vec<BannerItem>, String>) -> Self {
        let (ok, items, message) = list_envelope(op, result);
        Self { ok, items, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryListResponse {
    pub ok: bool,
    pub items: Vec<GalleryItem>,
    pub message: String,
}

impl GalleryListResponse {
    fn from_result(op: &str, result: Result<Vec<GalleryItem>, String>) -> Self {
        let (ok, items, message) = list_envelope(op, result);
        Self { ok, items, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyListResponse {
    pub ok: bool,
    pub items: Vec<FacultyItem>,
    pub message: String,
}

impl FacultyListResponse {
    fn from_result(op: &str, result: Result<Vec<FacultyItem>, String>) -> Self {
        let (ok, items, message) = list_envelope(op, result);
        Self { ok, items, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeListResponse {
    pub ok: bool,
    pub items: Vec<NoticeItem>,
    pub message: String,
}

impl NoticeListResponse {
    fn from_result(op: &str, result: Result<Vec<NoticeItem>, String>) -> Self {
        let (ok, items, message) = list_envelope(op, result);
        Self { ok, items, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableListResponse {
    pub ok: bool,
    pub items: Vec<TimetableItem>,
    pub message: String,
}

impl TimetableListResponse {
    fn from_result(op: &str, result: Result<Vec<TimetableItem>, String>) -> Self {
        let (ok, items, message) = list_envelope(op, result);
        Self { ok, items, message }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollegeInfoItem {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub about: String,
    pub established_year: Option<i64>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollegeInfoResponse {
    pub ok: bool,
    /// `None` until the profile has been saved once.
    pub info: Option<CollegeInfoItem>,
    pub message: String,
}

/// Loads the TOML config at `config_path` and opens a fresh admin session.
///
/// # FFI contract
/// - Replaces any previous session; loaded lists start empty.
/// - Calls already running keep the session they started with.
/// - Never panics.
pub fn configure(config_path: String) -> ActionResponse {
    let session = AdminConfig::load(config_path.trim())
        .map_err(|err| err.to_string())
        .and_then(|config| Session::open(&config));
    match session {
        Ok(session) => {
            *SESSION.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(session));
            info!("event=ffi_configure module=ffi status=ok");
            ActionResponse::success("Session configured.", None)
        }
        Err(err) => {
            warn!("event=ffi_configure module=ffi status=error error={err}");
            ActionResponse::failure(format!("configure failed: {err}"))
        }
    }
}

pub fn banners_load() -> BannerListResponse {
    let result = with_session(|session| {
        let mut banners = lock(&session.banners);
        let loaded = banners.load().map_err(|err| err.to_string())?;
        let items: Vec<BannerItem> = loaded.iter().map(to_banner_item).collect();
        Ok(items)
    });
    BannerListResponse::from_result("banners_load", result)
}

/// Uploads the image at `file_path` as a new banner.
pub fn banner_upload(file_path: String) -> ActionResponse {
    action("banner_upload", "Banner uploaded.", |session| {
        upload_banner(session, &file_path)
    })
}

pub fn banner_delete(id: String) -> ActionResponse {
    action("banner_delete", "Banner deleted.", |session| {
        lock(&session.banners)
            .delete(id.trim())
            .map_err(|err| err.to_string())?;
        Ok(None)
    })
}

pub fn faculty_load(include_inactive: bool) -> FacultyListResponse {
    let result = with_session(|session| {
        let mut faculty = lock(&session.faculty);
        let members = faculty
            .load(include_inactive)
            .map_err(|err| err.to_string())?;
        session.publish_faculty(members);
        let items: Vec<FacultyItem> = members.iter().map(to_faculty_item).collect();
        Ok(items)
    });
    FacultyListResponse::from_result("faculty_load", result)
}

/// Filters the loaded faculty list; `department` of `All` or empty disables it.
#[flutter_rust_bridge::frb(sync)]
pub fn faculty_filter(
    query: String,
    department: Option<String>,
    include_inactive: bool,
) -> FacultyListResponse {
    let filter = FacultyFilter {
        query,
        department,
        include_inactive,
    };
    let result = with_session(|session| Ok(filter_faculty(session, &filter)));
    FacultyListResponse::from_result("faculty_filter", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn faculty_departments() -> Vec<String> {
    with_session(|session| {
        let members = read(&session.faculty_view);
        let departments =
            distinct_values(members.iter().map(|member| member.department.as_str()));
        Ok(departments)
    })
    .unwrap_or_default()
}

/// Creates (empty `id`) or updates a faculty member, with an optional photo.
pub fn faculty_save(item: FacultyItem, photo_path: Option<String>) -> ActionResponse {
    action("faculty_save", "Faculty saved.", |session| {
        let photo = read_optional_media(photo_path.as_deref())?;
        let creating = item.id.trim().is_empty();
        let record = from_faculty_item(item);
        let mut faculty = lock(&session.faculty);
        let saved = if creating {
            faculty.create(record, photo.as_ref())
        } else {
            faculty.update(record, photo.as_ref())
        }
        .map_err(|err| err.to_string())?;
        session.publish_faculty(faculty.members());
        Ok(Some(saved.id))
    })
}

pub fn faculty_set_active(id: String, active: bool) -> ActionResponse {
    action("faculty_set_active", "Faculty status updated.", |session| {
        let mut faculty = lock(&session.faculty);
        let member = faculty
            .set_active(id.trim(), active)
            .map_err(|err| err.to_string())?;
        session.publish_faculty(faculty.members());
        Ok(Some(member.id))
    })
}

pub fn faculty_delete(id: String) -> ActionResponse {
    action("faculty_delete", "Faculty deleted.", |session| {
        let mut faculty = lock(&session.faculty);
        faculty.delete(id.trim()).map_err(|err| err.to_string())?;
        session.publish_faculty(faculty.members());
        Ok(None)
    })
}

pub fn notices_load() -> NoticeListResponse {
    let result = with_session(|session| {
        let mut notices = lock(&session.notices);
        let loaded = notices.load().map_err(|err| err.to_string())?;
        session.publish_notices(loaded);
        let items: Vec<NoticeItem> = loaded.iter().map(to_notice_item).collect();
        Ok(items)
    });
    NoticeListResponse::from_result("notices_load", result)
}

/// Filters the loaded notices; unknown `priority` labels fail the call.
#[flutter_rust_bridge::frb(sync)]
pub fn notices_filter(
    query: String,
    category: Option<String>,
    priority: Option<String>,
    active_only: bool,
) -> NoticeListResponse {
    let result = parse_priority_choice(priority.as_deref()).and_then(|priority| {
        let filter = NoticeFilter {
            query,
            category,
            priority,
            active_only,
        };
        with_session(|session| {
            let notices = read(&session.notice_view);
            let items: Vec<NoticeItem> = notices
                .iter()
                .filter(|notice| filter.matches(notice))
                .map(to_notice_item)
                .collect();
            Ok(items)
        })
    });
    NoticeListResponse::from_result("notices_filter", result)
}

/// Creates (empty `id`) or updates a notice, with an optional PDF attachment.
pub fn notice_save(item: NoticeItem, attachment_path: Option<String>) -> ActionResponse {
    action("notice_save", "Notice saved.", |session| {
        let attachment = read_optional_media(attachment_path.as_deref())?;
        let creating = item.id.trim().is_empty();
        let record = from_notice_item(item)?;
        let mut notices = lock(&session.notices);
        let saved = if creating {
            notices.create(record, attachment.as_ref())
        } else {
            notices.update(record, attachment.as_ref())
        }
        .map_err(|err| err.to_string())?;
        session.publish_notices(notices.notices());
        Ok(Some(saved.id))
    })
}

pub fn notice_set_active(id: String, active: bool) -> ActionResponse {
    action("notice_set_active", "Notice status updated.", |session| {
        let mut notices = lock(&session.notices);
        let notice = notices
            .set_active(id.trim(), active)
            .map_err(|err| err.to_string())?;
        session.publish_notices(notices.notices());
        Ok(Some(notice.id))
    })
}

pub fn notice_delete(id: String) -> ActionResponse {
    action("notice_delete", "Notice deleted.", |session| {
        let mut notices = lock(&session.notices);
        notices.delete(id.trim()).map_err(|err| err.to_string())?;
        session.publish_notices(notices.notices());
        Ok(None)
    })
}

pub fn timetable_load() -> TimetableListResponse {
    let result = with_session(|session| {
        let mut timetable = lock(&session.timetable);
        let entries = timetable.load().map_err(|err| err.to_string())?;
        session.publish_timetable(entries);
        let items: Vec<TimetableItem> = entries.iter().map(to_timetable_item).collect();
        Ok(items)
    });
    TimetableListResponse::from_result("timetable_load", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn timetable_filter(
    query: String,
    year: Option<String>,
    branch: Option<String>,
    day: Option<String>,
) -> TimetableListResponse {
    let result = parse_day_choice(day.as_deref()).and_then(|day| {
        let filter = TimetableFilter {
            query,
            year,
            branch,
            day,
        };
        with_session(|session| {
            let entries = read(&session.timetable_view);
            let items: Vec<TimetableItem> = entries
                .iter()
                .filter(|entry| filter.matches(entry))
                .map(to_timetable_item)
                .collect();
            Ok(items)
        })
    });
    TimetableListResponse::from_result("timetable_filter", result)
}

/// Creates (empty `id`) or updates a timetable entry.
pub fn timetable_save(item: TimetableItem) -> ActionResponse {
    action("timetable_save", "Timetable entry saved.", |session| {
        let creating = item.id.trim().is_empty();
        let record = from_timetable_item(item)?;
        let mut timetable = lock(&session.timetable);
        let saved = if creating {
            timetable.create(record)
        } else {
            timetable.update(record)
        }
        .map_err(|err| err.to_string())?;
        session.publish_timetable(timetable.entries());
        Ok(Some(saved.id))
    })
}

/// Soft-deletes a timetable entry.
pub fn timetable_delete(id: String) -> ActionResponse {
    action("timetable_delete", "Timetable entry removed.", |session| {
        let mut timetable = lock(&session.timetable);
        timetable.delete(id.trim()).map_err(|err| err.to_string())?;
        session.publish_timetable(timetable.entries());
        Ok(None)
    })
}

pub fn gallery_load() -> GalleryListResponse {
    let result = with_session(|session| {
        let mut gallery = lock(&session.gallery);
        let images = gallery.load().map_err(|err| err.to_string())?;
        let items: Vec<GalleryItem> = images.iter().map(to_gallery_item).collect();
        Ok(items)
    });
    GalleryListResponse::from_result("gallery_load", result)
}

pub fn gallery_upload(file_path: String, caption: String) -> ActionResponse {
    action("gallery_upload", "Image uploaded.", |session| {
        let file = read_media(&file_path)?;
        let image = lock(&session.gallery)
            .upload(&file, &caption)
            .map_err(|err| err.to_string())?;
        Ok(Some(image.id))
    })
}

pub fn gallery_update_caption(id: String, caption: String) -> ActionResponse {
    action("gallery_update_caption", "Caption updated.", |session| {
        let image = lock(&session.gallery)
            .update_caption(id.trim(), &caption)
            .map_err(|err| err.to_string())?;
        Ok(Some(image.id))
    })
}

pub fn gallery_delete(id: String) -> ActionResponse {
    action("gallery_delete", "Image deleted.", |session| {
        lock(&session.gallery)
            .delete(id.trim())
            .map_err(|err| err.to_string())?;
        Ok(None)
    })
}

pub fn college_info_load() -> CollegeInfoResponse {
    let result = with_session(|session| {
        let mut college_info = lock(&session.college_info);
        let info = college_info
            .load()
            .map_err(|err| err.to_string())?
            .map(to_college_info_item);
        Ok(info)
    });
    match result {
        Ok(Some(info)) => CollegeInfoResponse {
            ok: true,
            info: Some(info),
            message: "College info loaded.".to_string(),
        },
        Ok(None) => CollegeInfoResponse {
            ok: true,
            info: None,
            message: "College info not set.".to_string(),
        },
        Err(err) => CollegeInfoResponse {
            ok: false,
            info: None,
            message: format!("college_info_load failed: {err}"),
        },
    }
}

pub fn college_info_save(item: CollegeInfoItem) -> ActionResponse {
    action("college_info_save", "College info saved.", |session| {
        let saved = lock(&session.college_info)
            .save(from_college_info_item(item))
            .map_err(|err| err.to_string())?;
        Ok(Some(saved.id))
    })
}

fn upload_banner(session: &Session, file_path: &str) -> Result<Option<String>, String> {
    let file = read_media(file_path)?;
    let banner = lock(&session.banners)
        .upload(&file)
        .map_err(|err| err.to_string())?;
    Ok(Some(banner.id))
}

fn filter_faculty(session: &Session, filter: &FacultyFilter) -> Vec<FacultyItem> {
    read(&session.faculty_view)
        .iter()
        .filter(|member| filter.matches(member))
        .map(to_faculty_item)
        .collect()
}

/// Clones the current session handle; the global slot is never held across a
/// service call.
fn current_session() -> Result<Arc<Session>, String> {
    SESSION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| "session is not configured; call configure first".to_string())
}

fn with_session<T>(f: impl FnOnce(&Session) -> Result<T, String>) -> Result<T, String> {
    let session = current_session()?;
    f(&session)
}

fn action(
    op: &str,
    success_message: &str,
    f: impl FnOnce(&Session) -> Result<Option<String>, String>,
) -> ActionResponse {
    match with_session(f) {
        Ok(id) => ActionResponse::success(success_message, id),
        Err(err) => {
            warn!("event=ffi_action module=ffi op={op} status=error error={err}");
            ActionResponse::failure(format!("{op} failed: {err}"))
        }
    }
}

fn read_media(path: &str) -> Result<MediaFile, String> {
    MediaFile::from_path(path.trim()).map_err(|err| err.to_string())
}

fn read_optional_media(path: Option<&str>) -> Result<Option<MediaFile>, String> {
    match path.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => read_media(path).map(Some),
        None => Ok(None),
    }
}

fn parse_priority_choice(value: Option<&str>) -> Result<Option<NoticePriority>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) if label.eq_ignore_ascii_case("all") => Ok(None),
        Some(label) => NoticePriority::parse(label)
            .map(Some)
            .ok_or_else(|| format!("unknown priority `{label}`")),
    }
}

fn parse_day_choice(value: Option<&str>) -> Result<Option<Weekday>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) if label.eq_ignore_ascii_case("all") => Ok(None),
        Some(label) => Weekday::parse(label)
            .map(Some)
            .ok_or_else(|| format!("unknown day `{label}`")),
    }
}

fn to_banner_item(banner: &Banner) -> BannerItem {
    BannerItem {
        id: banner.id.clone(),
        image_url: banner.image_url.clone(),
        uploaded_at: banner.uploaded_at,
    }
}

fn to_gallery_item(image: &GalleryImage) -> GalleryItem {
    GalleryItem {
        id: image.id.clone(),
        image_url: image.image_url.clone(),
        caption: image.caption.clone(),
        uploaded_at: image.uploaded_at,
    }
}

fn to_faculty_item(member: &Faculty) -> FacultyItem {
    FacultyItem {
        id: member.id.clone(),
        name: member.name.clone(),
        email: member.email.clone(),
        phone: member.phone.clone(),
        department: member.department.clone(),
        designation: member.designation.clone(),
        qualification: member.qualification.clone(),
        experience: member.experience.clone(),
        specialization: member.specialization.clone(),
        image_url: member.image_url.clone(),
        joining_date: member.joining_date.clone(),
        is_active: member.is_active,
    }
}

fn from_faculty_item(item: FacultyItem) -> Faculty {
    Faculty {
        id: item.id.trim().to_string(),
        name: item.name.trim().to_string(),
        email: item.email.trim().to_string(),
        phone: item.phone.trim().to_string(),
        department: item.department.trim().to_string(),
        designation: item.designation.trim().to_string(),
        qualification: item.qualification.trim().to_string(),
        experience: item.experience.trim().to_string(),
        specialization: item.specialization.trim().to_string(),
        image_url: item.image_url,
        joining_date: item.joining_date.trim().to_string(),
        is_active: item.is_active,
    }
}

fn to_notice_item(notice: &Notice) -> NoticeItem {
    NoticeItem {
        id: notice.id.clone(),
        title: notice.title.clone(),
        description: notice.description.clone(),
        category: notice.category.clone(),
        priority: notice.priority.as_str().to_string(),
        attachment_url: notice.attachment_url.clone(),
        publish_date: notice.publish_date.clone(),
        published_by: notice.published_by.clone(),
        is_active: notice.is_active,
        created_at: notice.created_at,
    }
}

fn from_notice_item(item: NoticeItem) -> Result<Notice, String> {
    let priority = if item.priority.trim().is_empty() {
        NoticePriority::default()
    } else {
        NoticePriority::parse(&item.priority)
            .ok_or_else(|| format!("unknown priority `{}`", item.priority.trim()))?
    };
    Ok(Notice {
        id: item.id.trim().to_string(),
        title: item.title.trim().to_string(),
        description: item.description.trim().to_string(),
        category: item.category.trim().to_string(),
        priority,
        attachment_url: item.attachment_url,
        publish_date: item.publish_date.trim().to_string(),
        published_by: item.published_by.trim().to_string(),
        is_active: item.is_active,
        created_at: item.created_at,
    })
}

fn to_timetable_item(entry: &TimetableEntry) -> TimetableItem {
    TimetableItem {
        id: entry.id.clone(),
        year: entry.year.clone(),
        branch: entry.branch.clone(),
        day: entry.day.as_str().to_string(),
        time_slot: entry.time_slot.clone(),
        subject: entry.subject.clone(),
        subject_code: entry.subject_code.clone(),
        teacher_name: entry.teacher_name.clone(),
        room_number: entry.room_number.clone(),
        last_updated: entry.last_updated,
    }
}

fn from_timetable_item(item: TimetableItem) -> Result<TimetableEntry, String> {
    let day = Weekday::parse(&item.day).ok_or_else(|| format!("unknown day `{}`", item.day.trim()))?;
    let mut entry = TimetableEntry::new(
        item.year.trim(),
        item.branch.trim(),
        day,
        item.time_slot.trim(),
        item.subject.trim(),
        item.teacher_name.trim(),
    );
    entry.id = item.id.trim().to_string();
    entry.subject_code = item.subject_code.trim().to_string();
    entry.room_number = item.room_number.trim().to_string();
    Ok(entry)
}

fn to_college_info_item(info: &CollegeInfo) -> CollegeInfoItem {
    CollegeInfoItem {
        name: info.name.clone(),
        address: info.address.clone(),
        phone: info.phone.clone(),
        email: info.email.clone(),
        website: info.website.clone(),
        about: info.about.clone(),
        established_year: info.established_year,
        updated_at: info.updated_at,
    }
}

fn from_college_info_item(item: CollegeInfoItem) -> CollegeInfo {
    CollegeInfo {
        id: String::new(),
        name: item.name.trim().to_string(),
        address: item.address.trim().to_string(),
        phone: item.phone.trim().to_string(),
        email: item.email.trim().to_string(),
        website: item.website.trim().to_string(),
        about: item.about.trim().to_string(),
        established_year: item.established_year,
        updated_at: item.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        banner_upload, college_info_load, college_info_save, configure, core_version,
        faculty_departments, faculty_filter, faculty_load, faculty_save, filter_faculty,
        init_logging, notice_save, notices_filter, notices_load, ping, timetable_delete,
        timetable_filter, timetable_load, timetable_save, upload_banner, CollegeInfoItem,
        FacultyItem, NoticeItem, Session, TimetableItem,
    };
    use campusdesk_core::{AdminConfig, FacultyFilter};
    use std::io::Write;
    use std::net::TcpListener;
    use std::sync::{Arc, Once};
    use std::thread;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    static CONFIGURED: Once = Once::new();

    /// Configures one in-memory session shared by every test in this module.
    fn configured() {
        CONFIGURED.call_once(|| {
            let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
            config
                .write_all(
                    b"[store]\nbackend = \"sqlite\"\npath = \":memory:\"\n\n[media]\ncloud_name = \"demo\"\n",
                )
                .unwrap();
            let response = configure(config.path().display().to_string());
            assert!(response.ok, "{}", response.message);
        });
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_reports_missing_file() {
        let response = configure("/definitely/missing/campusdesk.toml".to_string());
        assert!(!response.ok);
        assert!(response.message.starts_with("configure failed"));
    }

    #[test]
    fn faculty_save_then_filter_finds_member() {
        configured();
        let token = unique_token("dept");
        let response = faculty_save(
            FacultyItem {
                name: "Asha Verma".to_string(),
                email: "asha@college.edu".to_string(),
                department: token.clone(),
                designation: "Lecturer".to_string(),
                is_active: true,
                ..FacultyItem::default()
            },
            None,
        );
        assert!(response.ok, "{}", response.message);

        let found = faculty_filter(String::new(), Some(token.clone()), false);
        assert!(found.ok);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, response.id.unwrap());
        assert!(faculty_departments().contains(&token));

        let loaded = faculty_load(false);
        assert!(loaded.ok, "{}", loaded.message);
        assert!(loaded.items.iter().any(|item| item.department == token));
    }

    #[test]
    fn faculty_save_surfaces_validation_errors() {
        configured();
        let response = faculty_save(
            FacultyItem {
                name: "No Email".to_string(),
                department: "Math".to_string(),
                designation: "Lecturer".to_string(),
                ..FacultyItem::default()
            },
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("faculty.email is required"));
    }

    #[test]
    fn timetable_save_filter_and_soft_delete() {
        configured();
        let branch = unique_token("branch");
        let response = timetable_save(TimetableItem {
            year: "3rd Year".to_string(),
            branch: branch.clone(),
            day: "tue".to_string(),
            time_slot: "09:00-10:00".to_string(),
            subject: "Algorithms".to_string(),
            teacher_name: "Dr. Sen".to_string(),
            ..TimetableItem::default()
        });
        assert!(response.ok, "{}", response.message);
        let id = response.id.unwrap();

        let found = timetable_filter(
            String::new(),
            None,
            Some(branch.clone()),
            Some("Tuesday".to_string()),
        );
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].day, "Tuesday");

        assert!(timetable_delete(id.clone()).ok);
        let loaded = timetable_load();
        assert!(loaded.ok);
        assert!(loaded.items.iter().all(|item| item.id != id));
    }

    #[test]
    fn timetable_save_rejects_unknown_day() {
        configured();
        let response = timetable_save(TimetableItem {
            day: "Funday".to_string(),
            ..TimetableItem::default()
        });
        assert!(!response.ok);
        assert!(response.message.contains("unknown day"));
    }

    #[test]
    fn notices_filter_rejects_unknown_priority() {
        configured();
        let response = notices_filter(String::new(), None, Some("critical".to_string()), false);
        assert!(!response.ok);
        assert!(response.message.contains("unknown priority"));
    }

    #[test]
    fn notice_save_without_attachment() {
        configured();
        let title = unique_token("notice");
        let response = notice_save(
            NoticeItem {
                title: title.clone(),
                description: "Campus closed".to_string(),
                category: "Holiday".to_string(),
                priority: "high".to_string(),
                is_active: true,
                ..NoticeItem::default()
            },
            None,
        );
        assert!(response.ok, "{}", response.message);

        let found = notices_filter(
            title.clone(),
            Some("All".to_string()),
            Some("High".to_string()),
            true,
        );
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].priority, "High");

        let loaded = notices_load();
        assert!(loaded.ok, "{}", loaded.message);
        assert!(loaded.items.iter().any(|item| item.title == title));
    }

    #[test]
    fn banner_upload_without_preset_fails_cleanly() {
        configured();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let response = banner_upload(path.display().to_string());
        assert!(!response.ok);
        assert!(response.message.contains("upload_preset"));
    }

    #[test]
    fn college_info_save_and_load() {
        configured();
        let saved = college_info_save(CollegeInfoItem {
            name: "City College".to_string(),
            established_year: Some(1962),
            ..CollegeInfoItem::default()
        });
        assert!(saved.ok, "{}", saved.message);

        let loaded = college_info_load();
        assert!(loaded.ok);
        assert_eq!(loaded.info.unwrap().established_year, Some(1962));
    }

    #[test]
    fn sync_filters_do_not_wait_for_a_stalled_upload() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });

        let config = AdminConfig::from_toml_str(&format!(
            r#"
[store]
backend = "sqlite"
path = ":memory:"

[media]
cloud_name = "demo"
upload_preset = "unsigned"
base_url = "http://127.0.0.1:{port}"

[http]
connect_timeout_secs = 1
read_timeout_secs = 2
bypass_proxy = true
"#
        ))
        .unwrap();
        let session = Arc::new(Session::open(&config).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let uploader = {
            let session = session.clone();
            let path = path.display().to_string();
            thread::spawn(move || upload_banner(&session, &path))
        };
        thread::sleep(Duration::from_millis(300));

        let started_at = Instant::now();
        let members = filter_faculty(&session, &FacultyFilter::default());
        let waited = started_at.elapsed();

        assert!(members.is_empty());
        assert!(waited < Duration::from_millis(500), "filter waited {waited:?}");

        let upload = uploader.join().unwrap();
        assert!(upload.is_err());
    }
}
