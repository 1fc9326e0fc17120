//! 외부 협력 시스템 연동.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `QuoteProvider` trait: 종목별 시세 스냅샷 조회
//! - Yahoo Finance quoteSummary 클라이언트 (crumb/쿠키 처리 포함)
//! - `DocumentStore` trait: 병합 기반 문서 Upsert
//! - Firestore REST 저장소 (서비스 계정 인증)
//! - 인메모리 저장소 (테스트 및 dry-run)

pub mod error;
pub mod provider;
pub mod store;

pub use error::*;
pub use provider::{QuoteProvider, YahooConfig, YahooQuoteProvider};
pub use store::{
    DocumentStore, FirestoreStore, MemoryStore, MergePolicy, ServiceAccountKey,
    ServiceAccountTokenSource, StaticToken, StoredDocument, TokenSource,
};
