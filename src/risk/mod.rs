pub mod capital_allocator;
pub mod position_sizing;
