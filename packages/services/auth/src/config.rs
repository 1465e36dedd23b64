//! Auth 서비스 설정

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use chrono::Duration;
use clove_core::auth::{HashParams, TokenConfig, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use clove_core::permissions::arn::DEFAULT_NAMESPACE;

/// Auth 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 공개 API 포트 (0.0.0.0)
    pub port: u16,

    /// 내부 API 바인드 주소
    pub internal_host: IpAddr,

    /// 내부 API 포트
    pub internal_port: u16,

    /// RS256 개인키 경로 (PKCS#8 PEM)
    pub private_key_path: PathBuf,

    /// RS256 공개키 경로 (SPKI PEM)
    pub public_key_path: PathBuf,

    /// JWT `kid` 헤더
    pub key_id: Option<String>,

    /// JWT issuer
    pub issuer: String,

    /// JWT audience
    pub audience: String,

    /// 신원 토큰 TTL (초)
    pub token_ttl_secs: i64,

    /// 시계 오차 허용 (초)
    pub leeway_secs: i64,

    /// ARN 네임스페이스
    pub arn_namespace: String,

    /// Argon2 메모리 (KiB)
    pub argon2_memory_kib: u32,

    /// Argon2 반복 횟수
    pub argon2_iterations: u32,

    /// Argon2 병렬도
    pub argon2_parallelism: u32,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = HashParams::DEFAULT;

        Ok(Self {
            port: env::var("CLOVE_AUTH_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,

            internal_host: env::var("CLOVE_AUTH_INTERNAL_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string())
                .parse()?,

            internal_port: env::var("CLOVE_AUTH_INTERNAL_PORT")
                .unwrap_or_else(|_| "8081".to_string())
                .parse()?,

            private_key_path: env::var("CLOVE_JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "./keys/private.pem".to_string())
                .into(),

            public_key_path: env::var("CLOVE_JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(|_| "./keys/public.pem".to_string())
                .into(),

            key_id: env::var("CLOVE_JWT_KEY_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            issuer: env::var("CLOVE_JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),

            audience: env::var("CLOVE_JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string()),

            token_ttl_secs: env::var("CLOVE_JWT_TTL_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()?,

            leeway_secs: env::var("CLOVE_JWT_LEEWAY_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,

            arn_namespace: env::var("CLOVE_ARN_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string()),

            argon2_memory_kib: env::var("CLOVE_ARGON2_MEMORY_KIB")
                .unwrap_or_else(|_| defaults.memory_cost_kib.to_string())
                .parse()?,

            argon2_iterations: env::var("CLOVE_ARGON2_ITERATIONS")
                .unwrap_or_else(|_| defaults.iterations.to_string())
                .parse()?,

            argon2_parallelism: env::var("CLOVE_ARGON2_PARALLELISM")
                .unwrap_or_else(|_| defaults.parallelism.to_string())
                .parse()?,
        })
    }

    /// 토큰 설정
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            access_ttl: Duration::seconds(self.token_ttl_secs),
            leeway: Duration::seconds(self.leeway_secs),
        }
        .normalized()
    }

    /// 비밀번호 해시 파라미터
    pub fn hash_params(&self) -> anyhow::Result<HashParams> {
        let params = HashParams {
            memory_cost_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
            ..HashParams::DEFAULT
        };
        params.validate()?;
        Ok(params)
    }
}
