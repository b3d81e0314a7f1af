//! 路径参数提取器
//!
//! 非法的 ID（非数字、0 或负数）在进入处理程序之前直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match parse_positive_id(raw) {
                    Some(id) => Ok($name(id)),
                    None => {
                        let message = format!("Invalid path parameter '{}': {}", $param, raw);
                        let response = HttpResponse::BadRequest().json(
                            ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()),
                        );
                        Err(InternalError::from_response(message, response).into())
                    }
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");
define_safe_i64_extractor!(SafeSubmissionIdI64, "submission_id");
