pub mod events;
pub mod seeding;
pub mod server;
