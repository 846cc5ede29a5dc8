//! Schedule Repository

use super::{Entity, Repository};
use crate::store::SortDirection;
use shared::models::{Schedule, ScheduleCreate, ScheduleUpdate};

impl Entity for Schedule {
    const TABLE: &'static str = "horarios";
    const COLUMNS: &'static str = "id, hora_ingreso, hora_salida";
    const ORDER: SortDirection = SortDirection::Ascending;
    const LABEL: &'static str = "Schedule";

    type Create = ScheduleCreate;
    type Update = ScheduleUpdate;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type ScheduleRepository = Repository<Schedule>;
