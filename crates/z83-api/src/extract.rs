//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body whose rejections render as [`ApiError::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as [`ApiError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
