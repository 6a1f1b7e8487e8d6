pub mod backup;
pub mod calculator;
pub mod context;
pub mod gym;
pub mod history;
pub mod injury;
pub mod lifecycle;
pub mod log;
pub mod member;
pub mod tagger;
pub mod tracker;
