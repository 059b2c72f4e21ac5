pub mod instruments;
pub mod kits;
pub mod scan_results;
pub mod settings;
