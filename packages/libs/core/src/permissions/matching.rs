//! action/resource 패턴 매칭
//!
//! 지원하는 형식은 세 가지뿐입니다:
//! - 정확히 일치
//! - `*` (전체)
//! - 끝이 `*`인 prefix (`s3:Get*`, `arn:clove:s3:::b1/*`)
//!
//! 중간 위치 와일드카드, 문자 클래스, 정규식은 지원하지 않습니다.

/// 값이 패턴과 일치하는지 확인
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
    if pattern == value || pattern == "*" {
        return true;
    }

    match pattern.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => false,
    }
}

/// 패턴 목록 중 하나라도 일치하는지 확인
pub fn matches_any(patterns: &[String], value: &str) -> bool {
    patterns.iter().any(|pattern| matches_pattern(pattern, value))
}
