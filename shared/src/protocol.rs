use crate::{
    LoginData, LoginRequest, RegisterRequest, UpdateProfileRequest, UserListEntry, UserProfile,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The type carried in the `data` field of a successful response.
    type Data: DeserializeOwned;
    /// The URL path, relative to the API base.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request must carry `Authorization: Bearer <token>`.
    const AUTHENTICATED: bool;
}

// =========================================================
// Request Definitions
// =========================================================

impl ApiRequest for RegisterRequest {
    type Data = serde_json::Value;
    const PATH: &'static str = "/user/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

impl ApiRequest for LoginRequest {
    type Data = LoginData;
    const PATH: &'static str = "/user/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

/// Fetch the profile of the session owner
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FetchProfileRequest;

impl ApiRequest for FetchProfileRequest {
    type Data = UserProfile;
    const PATH: &'static str = "/user/me";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;
}

impl ApiRequest for UpdateProfileRequest {
    type Data = UserProfile;
    const PATH: &'static str = "/user/me";
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTHENTICATED: bool = true;
}

/// List every registered account (admin only, enforced server side)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Data = Vec<UserListEntry>;
    const PATH: &'static str = "/api/admin/users";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;
}

/// Upload a profile picture as multipart form data.
/// The response shape is server defined, so it stays untyped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UploadPictureRequest;

impl ApiRequest for UploadPictureRequest {
    type Data = serde_json::Value;
    const PATH: &'static str = "/api/profile-picture/upload";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = true;
}
