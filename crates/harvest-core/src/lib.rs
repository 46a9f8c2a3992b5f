//! Harvest Core Library
//!
//! This library extracts structured event records from HAR captures of a
//! social-network event-discovery page, and exposes the extraction behind a
//! pluggable parser service so callers can swap the in-process parser for a
//! remote HTTP one without code changes.

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod har;
pub mod parser;
pub mod service;
pub mod timestamp;

pub use crate::{
    config::ParserConfig,
    error::{Error, Result},
    events::EventRecord,
    har::Har,
    parser::parse_har_file,
    service::{
        create_parser, list_available_services, ApiHarParserService, HarParserService,
        LocalHarParserService, ParseResult, ServiceInfo,
    },
};
