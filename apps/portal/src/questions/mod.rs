pub mod aggregates;
pub mod browse;
pub mod comments;
pub mod contribute;
pub mod feed;
pub mod slug;
