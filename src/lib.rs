pub mod catalog;
pub mod collapse;
pub mod config;
pub mod demo_feed;
pub mod failure_report;
pub mod match_record;
pub mod match_source;
pub mod match_store;
pub mod partnerships;
pub mod scorecard;
pub mod state;
