//! 个人资料视图
//!
//! 挂载时获取资料；缓存角色为管理员时同时获取用户列表。
//! 管理员标签页只看本地缓存的角色，不会逐次向服务端确认。

use std::time::Duration;

use accountdesk_shared::{UpdateProfileRequest, UserListEntry, UserProfile};
use tracing::debug;

use super::Banner;
use crate::api::AccountApi;
use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, UploadFile};
use crate::route::RouteGuard;
use crate::session::SessionStore;
use crate::validate::{
    Field, ValidationErrors, Validator, check_dob, check_image_url, check_name, check_phone,
};

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";
pub const PROFILE_FETCH_FAILED: &str = "Failed to fetch user profile";
pub const USERS_FETCH_FAILED: &str = "Failed to fetch users";
pub const PICTURE_UPLOADED: &str = "Profile picture uploaded";
pub const PICTURE_UPLOAD_FAILED: &str = "Failed to upload profile picture";

/// 资料卡中缺失字段的占位文本
pub const NOT_PROVIDED: &str = "Not provided";
/// 用户表中缺失字段的占位文本
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_IMAGE: &str = "No image";

/// 可选字段的展示值，空串与缺失同样处理
pub fn display_or<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Profile,
    Users,
}

impl ProfileTab {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileTab::Profile => "My Profile",
            ProfileTab::Users => "All Users",
        }
    }
}

/// 资料编辑草稿
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDraft {
    pub name: String,
    pub phone: String,
    pub dob: String,
    pub profile_pic: String,
}

impl EditDraft {
    /// 以当前资料为种子，缺失字段为空串
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            dob: profile.dob.clone().unwrap_or_default(),
            profile_pic: profile.profile_pic.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Dob => self.dob = value,
            Field::ProfilePic => self.profile_pic = value,
            _ => {}
        }
    }

    pub fn validate(&self) -> Result<UpdateProfileRequest, ValidationErrors> {
        Validator::new()
            .check(Field::Name, check_name(&self.name))
            .optional(Field::Phone, &self.phone, check_phone)
            .optional(Field::Dob, &self.dob, check_dob)
            .optional(Field::ProfilePic, &self.profile_pic, check_image_url)
            .finish()?;

        Ok(UpdateProfileRequest {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            dob: self.dob.trim().to_string(),
            profile_pic: self.profile_pic.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub profile: Option<UserProfile>,
    pub users: Vec<UserListEntry>,
    pub loading: bool,
    pub saving: bool,
    pub uploading: bool,
    pub banner: Option<Banner>,
    /// 编辑模式下的草稿
    pub edit: Option<EditDraft>,
    pub field_errors: ValidationErrors,
    tab: ProfileTab,
    is_admin: bool,
    banner_dismiss: Duration,
}

impl ProfileView {
    /// 挂载时从会话缓存读取角色
    pub fn new(session: &SessionStore, banner_dismiss: Duration) -> Self {
        Self {
            profile: None,
            users: Vec::new(),
            loading: true,
            saving: false,
            uploading: false,
            banner: None,
            edit: None,
            field_errors: ValidationErrors::default(),
            tab: ProfileTab::Profile,
            is_admin: session.is_admin(),
            banner_dismiss,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn tab(&self) -> ProfileTab {
        self.tab
    }

    pub fn visible_tabs(&self) -> Vec<ProfileTab> {
        if self.is_admin {
            vec![ProfileTab::Profile, ProfileTab::Users]
        } else {
            vec![ProfileTab::Profile]
        }
    }

    /// 非管理员选择用户列表时忽略，返回是否切换成功
    pub fn select_tab(&mut self, tab: ProfileTab) -> bool {
        if tab == ProfileTab::Users && !self.is_admin {
            return false;
        }
        self.tab = tab;
        true
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // =========================================================
    // 加载
    // =========================================================

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.banner = None;
    }

    /// 失败时资料保持未设置，只显示错误
    pub fn apply_profile(&mut self, result: ClientResult<UserProfile>) {
        self.loading = false;
        match result {
            Ok(profile) => self.profile = Some(profile),
            Err(ClientError::Cancelled) => {}
            Err(e) => self.banner = Some(Banner::error(load_error("profile", PROFILE_FETCH_FAILED, &e))),
        }
    }

    pub fn apply_users(&mut self, result: ClientResult<Vec<UserListEntry>>) {
        match result {
            Ok(users) => self.users = users,
            Err(ClientError::Cancelled) => {}
            Err(e) => self.banner = Some(Banner::error(load_error("users", USERS_FETCH_FAILED, &e))),
        }
    }

    /// 并发获取资料与（管理员）用户列表
    pub async fn load<C: HttpClient>(&mut self, api: &AccountApi<C>, cancel: &CancelToken) {
        self.begin_load();
        let is_admin = self.is_admin;
        let (profile, users) = futures::join!(api.fetch_profile(cancel), async {
            if is_admin {
                Some(api.list_users(cancel).await)
            } else {
                None
            }
        });
        self.apply_profile(profile);
        if let Some(users) = users {
            self.apply_users(users);
        }
    }

    // =========================================================
    // 编辑
    // =========================================================

    /// 没有资料时无法进入编辑
    pub fn start_edit(&mut self) -> bool {
        match &self.profile {
            Some(profile) => {
                self.edit = Some(EditDraft::from_profile(profile));
                self.field_errors = ValidationErrors::default();
                true
            }
            None => false,
        }
    }

    pub fn edit_field(&mut self, field: Field, value: String) {
        if let Some(draft) = self.edit.as_mut() {
            draft.set(field, value);
        }
    }

    /// 丢弃草稿
    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.field_errors = ValidationErrors::default();
    }

    pub fn begin_save(&mut self) -> Option<UpdateProfileRequest> {
        if self.saving {
            return None;
        }
        let draft = self.edit.as_ref()?;
        self.banner = None;
        match draft.validate() {
            Ok(req) => {
                self.field_errors = ValidationErrors::default();
                self.saving = true;
                Some(req)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    /// 成功时整体替换资料并退出编辑；失败时保留草稿
    pub fn finish_save(&mut self, result: ClientResult<UserProfile>) {
        self.saving = false;
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.edit = None;
                self.banner = Some(Banner::success(PROFILE_UPDATED).dismiss_after(self.banner_dismiss));
            }
            Err(ClientError::Cancelled) => {}
            Err(e) => self.banner = Some(Banner::error(e.user_message(PROFILE_UPDATE_FAILED))),
        }
    }

    pub async fn save<C: HttpClient>(&mut self, api: &AccountApi<C>, cancel: &CancelToken) {
        if let Some(req) = self.begin_save() {
            let result = api.update_profile(&req, cancel).await;
            self.finish_save(result);
        }
    }

    // =========================================================
    // 头像上传
    // =========================================================

    pub fn begin_upload(&mut self) -> bool {
        if self.uploading {
            return false;
        }
        self.uploading = true;
        self.banner = None;
        true
    }

    /// 响应里能找到图片地址时写入编辑草稿
    pub fn finish_upload(&mut self, result: ClientResult<serde_json::Value>) {
        self.uploading = false;
        match result {
            Ok(value) => {
                if let Some(url) = uploaded_url(&value) {
                    debug!(url, "uploaded picture url");
                    if let Some(draft) = self.edit.as_mut() {
                        draft.profile_pic = url.to_string();
                    }
                }
                self.banner = Some(Banner::success(PICTURE_UPLOADED));
            }
            Err(ClientError::Cancelled) => {}
            Err(e) => self.banner = Some(Banner::error(e.user_message(PICTURE_UPLOAD_FAILED))),
        }
    }

    pub async fn upload<C: HttpClient>(
        &mut self,
        api: &AccountApi<C>,
        file: UploadFile,
        cancel: &CancelToken,
    ) {
        if self.begin_upload() {
            let result = api.upload_profile_picture(file, cancel).await;
            self.finish_upload(result);
        }
    }

    /// 登出：清除会话并翻转守卫
    pub fn logout(&mut self, guard: &mut RouteGuard, session: &SessionStore) -> ClientResult<()> {
        guard.logout(session)?;
        self.profile = None;
        self.users.clear();
        self.edit = None;
        Ok(())
    }
}

fn load_error(what: &str, fallback: &str, e: &ClientError) -> String {
    match e {
        // 2xx 但消息不符
        ClientError::Rejected { status, .. } if (200..300).contains(status) => fallback.to_string(),
        ClientError::Rejected { status, .. } => {
            format!("Error fetching {}: server responded with status {}", what, status)
        }
        other => format!("Error fetching {}: {}", what, other.user_message(fallback)),
    }
}

fn uploaded_url(value: &serde_json::Value) -> Option<&str> {
    let data = value.get("data");
    data.and_then(|d| d.as_str())
        .or_else(|| data.and_then(|d| d.get("url")).and_then(|u| u.as_str()))
        .or_else(|| data.and_then(|d| d.get("profilePic")).and_then(|u| u.as_str()))
        .or_else(|| value.get("url").and_then(|u| u.as_str()))
}
