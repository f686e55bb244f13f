pub mod imports;
pub mod posts;
pub mod sections;
pub mod stories;
