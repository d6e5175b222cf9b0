use events::DomainEvent;
use serde::{Deserialize, Serialize};

/// A user account was created.
///
/// Carries the initial plain password so the welcome mail can hand it over.
/// The event only lives in memory between recording and dispatch.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub name: String,
    pub email: String,
    pub plain_password: String,
}

impl DomainEvent for UserRegistered {
    const EVENT_TYPE: &'static str = "UserRegistered";
}

impl std::fmt::Debug for UserRegistered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRegistered")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("plain_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use events::EventRecorder;

    use super::*;

    #[test]
    fn recorded_registration_does_not_leak_the_password() {
        let recorder = EventRecorder::new();
        recorder
            .record(&UserRegistered {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                plain_password: "482913".to_string(),
            })
            .unwrap();

        assert!(!format!("{recorder:?}").contains("482913"));
        let released = recorder.release_events();
        assert!(!format!("{:?}", released[0]).contains("482913"));
        assert_eq!(
            released[0].decode::<UserRegistered>().unwrap().plain_password,
            "482913"
        );
    }
}
