pub mod analytics;
pub mod merge;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod table;
