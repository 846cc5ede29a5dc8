//! Job Title Repository

use super::{Entity, Repository};
use crate::store::SortDirection;
use shared::models::{JobTitle, JobTitleCreate, JobTitleUpdate};

impl Entity for JobTitle {
    const TABLE: &'static str = "cargos";
    const COLUMNS: &'static str = "id, cargo, sueldo";
    const ORDER: SortDirection = SortDirection::Descending;
    const LABEL: &'static str = "Job title";

    type Create = JobTitleCreate;
    type Update = JobTitleUpdate;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type JobTitleRepository = Repository<JobTitle>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_developer_salary_lifecycle() {
        let repo = JobTitleRepository::new(Arc::new(MemoryStore::school()));

        let created = repo
            .create(&JobTitleCreate::new("Developer").with_base_salary(Decimal::new(300000, 2)))
            .await
            .unwrap();
        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(listed[0].base_salary, Decimal::new(300000, 2));

        let patch = JobTitleUpdate {
            base_salary: Some(Decimal::new(350000, 2)),
            ..Default::default()
        };
        repo.update(created.id, &patch).await.unwrap();
        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].name, "Developer");
        assert_eq!(listed[0].base_salary, Decimal::new(350000, 2));

        repo.delete(created.id).await.unwrap();
        assert!(repo.list().await.unwrap().iter().all(|j| j.id != created.id));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = JobTitleRepository::new(Arc::new(MemoryStore::school()));
        for name in ["Teacher", "Principal", "Janitor"] {
            repo.create(&JobTitleCreate::new(name)).await.unwrap();
        }
        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_omitted_salary_is_zero() {
        let repo = JobTitleRepository::new(Arc::new(MemoryStore::school()));
        let created = repo.create(&JobTitleCreate::new("Volunteer")).await.unwrap();
        assert!(created.base_salary.is_zero());
    }
}
