//! 리소스 식별자 (ARN 형식)
//!
//! - 버킷: `arn:<namespace>:s3:::<bucket>`
//! - 객체: `arn:<namespace>:s3:::<bucket>/<key>`

/// 기본 네임스페이스
pub const DEFAULT_NAMESPACE: &str = "clove";

/// 모든 리소스
pub const ALL_RESOURCES: &str = "*";

/// 버킷 ARN
pub fn bucket_arn(namespace: &str, bucket: &str) -> String {
    format!("arn:{namespace}:s3:::{bucket}")
}

/// 객체 ARN
pub fn object_arn(namespace: &str, bucket: &str, key: &str) -> String {
    format!("arn:{namespace}:s3:::{bucket}/{key}")
}

/// prefix 아래 모든 객체를 가리키는 패턴 (`.../prefix*`)
pub fn object_prefix_arn(namespace: &str, bucket: &str, prefix: &str) -> String {
    format!("arn:{namespace}:s3:::{bucket}/{prefix}*")
}
