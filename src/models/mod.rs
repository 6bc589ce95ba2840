pub mod context;
pub mod entity;
pub mod event;
pub mod health;
pub mod message;
pub mod outcome;
pub mod request;
pub mod response;
pub mod template;
