//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`。
//! 只把网络层失败映射为 `ClientError::Transport`，状态码原样交给 API 网关判断。

use accountdesk::{ClientError, ClientResult, HttpRequest, HttpResponse, RequestBody, UploadFile};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn build_failed(e: JsValue) -> ClientError {
    ClientError::transport(format!("请求构建失败: {:?}", e))
}

/// 把上传文件包装成 `FormData`
///
/// 不设置 Content-Type，浏览器会带上 multipart 边界。
fn form_data(field: &str, file: &UploadFile) -> ClientResult<FormData> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let opts = BlobPropertyBag::new();
    opts.set_type(&file.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts).map_err(build_failed)?;

    let form = FormData::new().map_err(build_failed)?;
    form.append_with_blob_and_filename(field, &blob, &file.file_name)
        .map_err(build_failed)?;
    Ok(form)
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    async fn text(response: &Response) -> ClientResult<String> {
        let promise = response
            .text()
            .map_err(|e| ClientError::transport(format!("响应读取失败: {:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ClientError::transport(format!("响应读取失败: {:?}", e)))?;

        text.as_string()
            .ok_or_else(|| ClientError::transport("无法转换为字符串"))
    }
}

#[async_trait::async_trait(?Send)]
impl accountdesk::HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let headers = Headers::new().map_err(build_failed)?;
        for (key, value) in &req.headers {
            headers.set(key, value).map_err(build_failed)?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(RequestBody::Multipart { field, file }) => {
                opts.set_body(&form_data(field, file)?.into())
            }
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts).map_err(build_failed)?;

        let window =
            web_sys::window().ok_or_else(|| ClientError::transport("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ClientError::transport(format!("网络错误: {:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::transport(format!("Response 类型转换失败: {:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: Self::text(&response).await?,
        })
    }
}
