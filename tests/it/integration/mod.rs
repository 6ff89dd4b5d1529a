//! Integration tests for the full pipeline.

mod export_workflow_tests;
mod session_tests;
mod workbook_tests;
