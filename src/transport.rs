//! The browser [Transport], backed by the Fetch API through gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::{
    api::{ApiRequest, ApiResponse, Method, MultipartForm, RequestBody, Transport},
    error::ApiError,
    upload::UploadFile,
};

#[derive(Debug, Default)]
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let response = attach_body(builder, request.body)?
            .send()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

fn attach_body(builder: RequestBuilder, body: RequestBody) -> Result<Request, ApiError> {
    let built = match body {
        RequestBody::Empty => builder.build(),
        RequestBody::Json(text) => builder
            .header("Content-Type", "application/json")
            .body(text),
        RequestBody::UrlEncoded(text) => builder
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(text),
        // The browser sets the multipart boundary itself.
        RequestBody::Multipart(form) => builder.body(form_data(&form)?),
    };

    built.map_err(|error| ApiError::Request(error.to_string()))
}

fn form_data(form: &MultipartForm) -> Result<FormData, ApiError> {
    let data = FormData::new().map_err(js_error)?;

    for (name, file) in &form.files {
        data.append_with_blob_and_filename(name, &blob(file)?, &file.name)
            .map_err(js_error)?;
    }
    for (name, value) in &form.fields {
        data.append_with_str(name, value).map_err(js_error)?;
    }

    Ok(data)
}

fn blob(file: &UploadFile) -> Result<Blob, ApiError> {
    let parts = Array::of1(&Uint8Array::from(file.bytes.as_slice()));
    let mut options = BlobPropertyBag::new();
    #[allow(deprecated)]
    options.type_(&file.content_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)
}

fn js_error(value: JsValue) -> ApiError {
    ApiError::Request(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
