use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::OfficerSeed;
use crate::entity::grievance;
use crate::officer::{NewOfficer, OfficerDirectory};
use crate::store::{ServiceError, StorePolicy};

/// Provision configured officers whose mobile is not registered yet.
pub async fn seed_officers(
    db: &DatabaseConnection,
    policy: &StorePolicy,
    officers: &[OfficerSeed],
) -> Result<(), ServiceError> {
    let directory = OfficerDirectory::new(db, policy);
    let mut inserted = 0u32;

    for seed in officers {
        let new = NewOfficer {
            name: seed.name.clone(),
            mobile: seed.mobile.clone(),
            password: seed.password.clone(),
            email: seed.email.clone(),
            designation: seed.designation.clone(),
            department: seed.department.clone(),
        };

        match directory.provision(new).await {
            Ok(_) => inserted += 1,
            Err(ServiceError::Conflict(_)) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new officers", inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = handler_status_index();

    match db.execute_unprepared(&render(db.get_database_backend(), &stmt)).await {
        Ok(_) => {
            info!("Ensured index idx_grievance_handler_status exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_grievance_handler_status: {}", e);
        }
    }

    Ok(())
}

// Status-filtered `mine=true` listings:
// SELECT ... FROM grievance WHERE handled_by = ? AND status = ?
fn handler_status_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name("idx_grievance_handler_status")
        .table(grievance::Entity)
        .col(grievance::Column::HandledBy)
        .col(grievance::Column::Status)
        .to_owned()
}

fn render(backend: DatabaseBackend, stmt: &IndexCreateStatement) -> String {
    match backend {
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    }
}
