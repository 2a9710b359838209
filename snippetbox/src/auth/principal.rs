use crate::models::UserId;

/// Who is making the current request, recomputed from the session every time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Principal {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }
}
