use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use events::EventRecorder;

use super::{
    CreateSubject, DeleteSubject, SubjectError, SubjectFactory, SubjectRepository, UpdateSubject,
};
use crate::command::CommandHandler;
use crate::error::{DomainError, RepositoryError};

pub struct CreateSubjectHandler {
    subjects: Arc<dyn SubjectRepository>,
    factory: SubjectFactory,
}

impl CreateSubjectHandler {
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self {
            subjects,
            factory: SubjectFactory,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateSubject> for CreateSubjectHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: CreateSubject,
        _events: &EventRecorder,
    ) -> Result<EntityId, DomainError> {
        let subject = self.factory.create(&command.description)?;
        let subject = self.subjects.save(subject).await?;
        let id = subject
            .id()
            .ok_or(RepositoryError::NotPersisted("Subject"))?;

        tracing::info!(subject_id = %id, "subject created");
        Ok(id)
    }
}

pub struct UpdateSubjectHandler {
    subjects: Arc<dyn SubjectRepository>,
}

impl UpdateSubjectHandler {
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { subjects }
    }
}

#[async_trait]
impl CommandHandler<UpdateSubject> for UpdateSubjectHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: UpdateSubject,
        _events: &EventRecorder,
    ) -> Result<(), DomainError> {
        let mut subject = self
            .subjects
            .get(command.id)
            .await?
            .ok_or(SubjectError::NotFound(command.id))?;

        subject.describe(command.description)?;
        self.subjects.save(subject).await?;
        Ok(())
    }
}

pub struct DeleteSubjectHandler {
    subjects: Arc<dyn SubjectRepository>,
}

impl DeleteSubjectHandler {
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { subjects }
    }
}

#[async_trait]
impl CommandHandler<DeleteSubject> for DeleteSubjectHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: DeleteSubject,
        _events: &EventRecorder,
    ) -> Result<(), DomainError> {
        let subject = self
            .subjects
            .get(command.id)
            .await?
            .ok_or(SubjectError::NotFound(command.id))?;

        self.subjects.delete(&subject).await?;
        tracing::info!(subject_id = %command.id, "subject deleted");
        Ok(())
    }
}
