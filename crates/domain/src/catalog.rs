//! Wiring of repositories, services and handlers into one command bus.

use std::sync::{Arc, Weak};

use events::SubscriberRegistry;

use crate::author::{
    AuthorRepository, CreateAuthor, CreateAuthorHandler, DeleteAuthor, DeleteAuthorHandler,
    UpdateAuthor, UpdateAuthorHandler,
};
use crate::book::{
    BookRepository, CreateBook, CreateBookHandler, DeleteBook, DeleteBookHandler, UpdateBook,
    UpdateBookHandler,
};
use crate::bus::CommandBus;
use crate::category::{
    CategoryRepository, CreateCategory, CreateCategoryHandler, DeleteCategory,
    DeleteCategoryHandler, UpdateCategory, UpdateCategoryHandler,
};
use crate::middleware::{ReleaseRecordedEventsMiddleware, TracingMiddleware};
use crate::report::ReportRepository;
use crate::services::{Mailer, PasswordEncoder};
use crate::subject::{
    CreateSubject, CreateSubjectHandler, DeleteSubject, DeleteSubjectHandler, SubjectRepository,
    UpdateSubject, UpdateSubjectHandler,
};
use crate::user::{
    CreateUser, CreateUserHandler, DeleteUser, DeleteUserHandler, SendUserWelcomeEmail,
    SendUserWelcomeEmailHandler, UpdateUser, UpdateUserHandler, UserRepository,
    WelcomeEmailSubscriber,
};

/// Every repository the handlers and read endpoints need.
#[derive(Clone)]
pub struct Repositories {
    pub authors: Arc<dyn AuthorRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub books: Arc<dyn BookRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

/// Application services injected into handlers.
#[derive(Clone)]
pub struct Services {
    pub password_encoder: Arc<dyn PasswordEncoder>,
    pub mailer: Arc<dyn Mailer>,
}

/// Builds the command bus with every handler registered and the standard
/// middleware chain: tracing, then event release.
pub fn build_command_bus(repositories: &Repositories, services: &Services) -> Arc<CommandBus> {
    build_command_bus_with_subscribers(repositories, services, SubscriberRegistry::new())
}

/// Like [`build_command_bus`], delivering released events to `subscribers`
/// as well as to the built-in ones.
pub fn build_command_bus_with_subscribers(
    repositories: &Repositories,
    services: &Services,
    subscribers: SubscriberRegistry,
) -> Arc<CommandBus> {
    Arc::new_cyclic(|bus: &Weak<CommandBus>| {
        let subscribers = subscribers.with(Arc::new(WelcomeEmailSubscriber::new(bus.clone())));
        let r = repositories;

        CommandBus::builder()
            .middleware(Arc::new(TracingMiddleware))
            .middleware(Arc::new(ReleaseRecordedEventsMiddleware::new(Arc::new(
                subscribers,
            ))))
            .handler::<CreateAuthor, _>(CreateAuthorHandler::new(r.authors.clone()))
            .handler::<UpdateAuthor, _>(UpdateAuthorHandler::new(r.authors.clone()))
            .handler::<DeleteAuthor, _>(DeleteAuthorHandler::new(r.authors.clone()))
            .handler::<CreateSubject, _>(CreateSubjectHandler::new(r.subjects.clone()))
            .handler::<UpdateSubject, _>(UpdateSubjectHandler::new(r.subjects.clone()))
            .handler::<DeleteSubject, _>(DeleteSubjectHandler::new(r.subjects.clone()))
            .handler::<CreateCategory, _>(CreateCategoryHandler::new(r.categories.clone()))
            .handler::<UpdateCategory, _>(UpdateCategoryHandler::new(r.categories.clone()))
            .handler::<DeleteCategory, _>(DeleteCategoryHandler::new(r.categories.clone()))
            .handler::<CreateBook, _>(CreateBookHandler::new(
                r.books.clone(),
                r.authors.clone(),
                r.subjects.clone(),
            ))
            .handler::<UpdateBook, _>(UpdateBookHandler::new(
                r.books.clone(),
                r.authors.clone(),
                r.subjects.clone(),
            ))
            .handler::<DeleteBook, _>(DeleteBookHandler::new(r.books.clone()))
            .handler::<CreateUser, _>(CreateUserHandler::new(
                r.users.clone(),
                services.password_encoder.clone(),
            ))
            .handler::<UpdateUser, _>(UpdateUserHandler::new(
                r.users.clone(),
                services.password_encoder.clone(),
            ))
            .handler::<DeleteUser, _>(DeleteUserHandler::new(r.users.clone()))
            .handler::<SendUserWelcomeEmail, _>(SendUserWelcomeEmailHandler::new(
                services.mailer.clone(),
            ))
            .build()
    })
}
