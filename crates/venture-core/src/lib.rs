//! # Venture Core
//!
//! 시장 데이터 업데이터의 핵심 도메인 타입을 제공합니다.
//!
//! - 심볼 및 정규화 키 (거래소 접미사 제거)
//! - 심볼 유니버스 (순서 유지, 중복 제거)
//! - 필드 프로파일 (realtime / daily / monthly)
//! - 시세 스냅샷 및 병합 문서
//! - 로깅 인프라

pub mod error;
pub mod logging;
pub mod profile;
pub mod record;
pub mod snapshot;
pub mod symbol;
pub mod universe;

pub use error::*;
pub use logging::*;
pub use profile::{FieldProfile, FieldSpec, ProfileKind};
pub use record::{FieldValue, MergeDocument, DATA_SOURCE};
pub use snapshot::QuoteSnapshot;
pub use symbol::{normalize_symbol, Symbol, KNOWN_SUFFIXES};
pub use universe::SymbolUniverse;
