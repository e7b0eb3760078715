//! Employment and service-assignment management.

use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, Service, User};

pub fn add_employee(conn: &Connection, business_id: &str, user_id: &str) -> Result<User, AppError> {
    queries::get_business_by_id(conn, business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;
    queries::get_user_by_id(conn, user_id)?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    queries::set_user_business(conn, user_id, Some(business_id), Role::Employee)?;

    let user = queries::get_user_by_id(conn, user_id)?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    Ok(user)
}

pub fn remove_employee(conn: &Connection, user_id: &str) -> Result<User, AppError> {
    let user = queries::get_user_by_id(conn, user_id)?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    // Only the employment link is severed; the role is left as-is.
    queries::set_user_business(conn, user_id, None, user.role)?;

    let user = queries::get_user_by_id(conn, user_id)?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    Ok(user)
}

pub fn list_employees(conn: &Connection, business_id: &str) -> Result<Vec<User>, AppError> {
    queries::get_business_by_id(conn, business_id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;
    Ok(queries::list_employees_by_business(conn, business_id)?)
}

pub fn assign_service(conn: &Connection, employee_id: &str, service_id: &str) -> Result<(), AppError> {
    queries::get_user_by_id(conn, employee_id)?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;
    queries::get_service_by_id(conn, service_id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    if queries::assignment_exists(conn, employee_id, service_id)? {
        return Err(AppError::BadRequest(
            "service already assigned to employee".to_string(),
        ));
    }

    queries::assign_service(conn, employee_id, service_id)?;
    Ok(())
}

pub fn unassign_service(conn: &Connection, employee_id: &str, service_id: &str) -> Result<(), AppError> {
    if !queries::unassign_service(conn, employee_id, service_id)? {
        return Err(AppError::NotFound("assignment not found".to_string()));
    }
    Ok(())
}

pub fn services_for_employee(conn: &Connection, employee_id: &str) -> Result<Vec<Service>, AppError> {
    queries::get_user_by_id(conn, employee_id)?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;
    Ok(queries::list_services_for_employee(conn, employee_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Business, Service};
    use chrono::Utc;
    use uuid::Uuid;

    struct Fixture {
        conn: Connection,
        business_id: String,
        user_id: String,
        service_id: String,
    }

    fn setup() -> Fixture {
        let conn = db::init_db(":memory:").unwrap();
        let now = Utc::now().naive_utc();

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            role: Role::Client,
            business_id: None,
            created_at: now,
        };
        queries::create_user(&conn, &user).unwrap();

        let business = Business {
            id: Uuid::new_v4().to_string(),
            name: "Corte Fino".to_string(),
            slug: "corte-fino".to_string(),
            address: None,
            description: None,
            owner_id: user.id.clone(),
            created_at: now,
        };
        queries::create_business(&conn, &business).unwrap();

        let service = Service {
            id: Uuid::new_v4().to_string(),
            business_id: business.id.clone(),
            name: "Haircut".to_string(),
            description: None,
            duration_minutes: 30,
            price: 15.0,
            created_at: now,
        };
        queries::create_service(&conn, &service).unwrap();

        Fixture {
            conn,
            business_id: business.id,
            user_id: user.id,
            service_id: service.id,
        }
    }

    #[test]
    fn test_add_and_remove_employee() {
        let f = setup();

        let user = add_employee(&f.conn, &f.business_id, &f.user_id).unwrap();
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.business_id.as_deref(), Some(f.business_id.as_str()));

        let listed = list_employees(&f.conn, &f.business_id).unwrap();
        assert_eq!(listed.len(), 1);

        let user = remove_employee(&f.conn, &f.user_id).unwrap();
        assert_eq!(user.business_id, None);
        assert!(list_employees(&f.conn, &f.business_id).unwrap().is_empty());
    }

    #[test]
    fn test_add_employee_unknown_business() {
        let f = setup();
        assert!(matches!(
            add_employee(&f.conn, "missing", &f.user_id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_assign_and_unassign_service() {
        let f = setup();
        add_employee(&f.conn, &f.business_id, &f.user_id).unwrap();

        assign_service(&f.conn, &f.user_id, &f.service_id).unwrap();
        let services = services_for_employee(&f.conn, &f.user_id).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].id, f.service_id);

        // double assignment is rejected
        assert!(matches!(
            assign_service(&f.conn, &f.user_id, &f.service_id),
            Err(AppError::BadRequest(_))
        ));

        unassign_service(&f.conn, &f.user_id, &f.service_id).unwrap();
        assert!(services_for_employee(&f.conn, &f.user_id).unwrap().is_empty());

        assert!(matches!(
            unassign_service(&f.conn, &f.user_id, &f.service_id),
            Err(AppError::NotFound(_))
        ));
    }
}
