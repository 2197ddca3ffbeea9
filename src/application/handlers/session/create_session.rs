//! CreateSessionHandler - Command handler for creating new sessions.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionCode;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// How many generated codes are tried before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 8;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub name: String,
    pub questions: Vec<String>,
}

type CodeGenerator = Box<dyn Fn() -> SessionCode + Send + Sync>;

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    repository: Arc<dyn SessionRepository>,
    generate_code: CodeGenerator,
}

impl CreateSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            generate_code: Box::new(SessionCode::generate),
        }
    }

    /// Replaces the random code source.
    pub fn with_code_generator(
        mut self,
        generator: impl Fn() -> SessionCode + Send + Sync + 'static,
    ) -> Self {
        self.generate_code = Box::new(generator);
        self
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<Session, SessionError> {
        // Validate before touching storage. A taken code is never overwritten.
        let mut session = Session::new((self.generate_code)(), cmd.name, cmd.questions)?;

        let mut attempts = 1;
        while !self.repository.insert(&session).await? {
            if attempts >= MAX_CODE_ATTEMPTS {
                return Err(SessionError::infrastructure(format!(
                    "Could not allocate a unique session code after {} attempts",
                    attempts
                )));
            }
            session = session.with_code((self.generate_code)());
            attempts += 1;
        }

        info!(
            session_code = %session.code(),
            question_count = session.question_count(),
            "Session created"
        );

        Ok(session)
    }
}
