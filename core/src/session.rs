//! Who is signed in.
//!
//! The core reads the provider on every intent and refresh, so a sign-out
//! takes effect on the next call without any notification.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::{User, UserId};

pub trait SessionProvider: Send + Sync + 'static {
    fn current_user(&self) -> Option<User>;
}

impl<S: SessionProvider + ?Sized> SessionProvider for Arc<S> {
    fn current_user(&self) -> Option<User> {
        (**self).current_user()
    }
}

/// Mutable session shared between the auth layer and the core.
#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn signed_in(id: UserId) -> Self {
        Self {
            user: RwLock::new(Some(User { id })),
        }
    }

    pub fn sign_in(&self, id: UserId) {
        *self.user.write() = Some(User { id });
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl SessionProvider for Session {
    fn current_user(&self) -> Option<User> {
        *self.user.read()
    }
}
