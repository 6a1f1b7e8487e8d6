pub mod belt;
pub mod category;
pub mod curriculum;
pub mod direction;
pub mod drilled;
pub mod event;
pub mod gym;
pub mod injury;
pub mod member;
pub mod opponent;
pub mod round;
pub mod session;
pub mod session_type;
pub mod weight;
