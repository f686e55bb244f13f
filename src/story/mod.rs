pub mod collator;
pub mod importer;
pub mod interpreter;
pub mod payload;
pub mod sync;
