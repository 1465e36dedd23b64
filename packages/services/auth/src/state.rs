//! Auth 앱 상태

use std::sync::Arc;

use clove_core::auth::{CredentialIssuer, HashParams, TokenKeys, TokenService};
use clove_core::permissions::PolicyBuilder;

use crate::config::Config;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 시작 후에는 읽기 전용입니다.
#[derive(Debug)]
pub struct AppState {
    /// 신원 토큰 서비스
    pub tokens: TokenService,

    /// 세션 자격증명 발급기
    pub credentials: CredentialIssuer,

    /// 비밀번호 해시 파라미터
    pub hash_params: HashParams,
}

impl AppState {
    /// 설정의 키 파일을 읽어 상태 생성
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut keys =
            TokenKeys::from_pem_files(&config.private_key_path, &config.public_key_path)?;
        if let Some(key_id) = &config.key_id {
            keys = keys.with_key_id(key_id.clone());
        }

        tracing::info!(
            private_key = %config.private_key_path.display(),
            key_id = ?keys.key_id(),
            "signing keys loaded"
        );

        Self::from_parts(Arc::new(keys), config)
    }

    /// 이미 로드된 키로 상태 생성
    pub fn from_parts(keys: Arc<TokenKeys>, config: &Config) -> anyhow::Result<Self> {
        let token_config = config.token_config();

        Ok(Self {
            tokens: TokenService::new(keys.clone(), token_config.clone()),
            credentials: CredentialIssuer::new(
                keys,
                token_config,
                PolicyBuilder::new(config.arn_namespace.clone()),
            ),
            hash_params: config.hash_params()?,
        })
    }
}
