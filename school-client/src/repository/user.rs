//! User Repository

use super::{Entity, Repository};
use crate::store::SortDirection;
use shared::models::{User, UserCreate, UserUpdate};

impl Entity for User {
    const TABLE: &'static str = "usuarios";
    const COLUMNS: &'static str = "id, nombre, email, telefono";
    const ORDER: SortDirection = SortDirection::Descending;
    const LABEL: &'static str = "User";

    type Create = UserCreate;
    type Update = UserUpdate;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type UserRepository = Repository<User>;
