//! Domain layer for the library catalog service.
//!
//! This crate provides:
//! - the command bus with its middleware chain and event recorder handoff
//! - one module per entity (authors, books, subjects, categories, users),
//!   each with its commands, handlers, factory, and repository trait
//! - application services (password hashing, mail) used by handlers
//! - [`catalog::build_command_bus`] wiring every handler together

pub mod author;
pub mod book;
pub mod bus;
pub mod catalog;
pub mod category;
pub mod command;
pub mod error;
pub mod middleware;
pub mod report;
pub mod repository;
pub mod services;
pub mod subject;
mod text;
pub mod user;

pub use author::{Author, AuthorError, AuthorRepository, CreateAuthor, DeleteAuthor, UpdateAuthor};
pub use book::{Book, BookDetails, BookError, BookRepository, CreateBook, DeleteBook, UpdateBook};
pub use bus::{CommandBus, CommandBusBuilder, Middleware, Next, Outcome};
pub use catalog::{
    Repositories, Services, build_command_bus, build_command_bus_with_subscribers,
};
pub use category::{
    Category, CategoryError, CategoryRepository, CreateCategory, DeleteCategory, UpdateCategory,
};
pub use command::{Command, CommandHandler, Envelope};
pub use error::{DomainError, RepositoryError};
pub use middleware::{ReleaseRecordedEventsMiddleware, TracingMiddleware};
pub use report::{BooksByAuthor, ReportRepository};
pub use repository::Repository;
pub use services::{
    Argon2PasswordEncoder, InMemoryMailer, Mailer, PasswordEncoder, SentMail, ServiceError,
    TracingMailer,
};
pub use subject::{CreateSubject, DeleteSubject, Subject, SubjectError, SubjectRepository, UpdateSubject};
pub use user::{
    CreateUser, DeleteUser, Role, SendUserWelcomeEmail, UpdateUser, User, UserError,
    UserProfile, UserRegistered, UserRepository, WelcomeEmailSubscriber,
};
