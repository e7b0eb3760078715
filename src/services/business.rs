//! Business management: slug generation, tenant lookup, CRUD.

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Business, Role};

/// Slugs that collide with platform subdomains.
const RESERVED_SLUGS: &[&str] = &["www", "api", "admin", "app", "mail", "ftp", "blog", "test", "dev"];

#[derive(Debug)]
pub struct NewBusiness {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct BusinessUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Folds the accented Latin letters common in Spanish and Portuguese names
/// onto their ASCII base so "Barbería" slugs as "barberia", not "barber-a".
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        c => c,
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `exclude_id` lets a business keep its own slug across a rename.
fn unique_slug(conn: &Connection, name: &str, exclude_id: Option<&str>) -> Result<String, AppError> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(AppError::Validation(
            "business name must contain at least one alphanumeric character".to_string(),
        ));
    }
    if RESERVED_SLUGS.contains(&base.as_str()) {
        return Err(AppError::BadRequest(format!(
            "business name '{name}' is not allowed"
        )));
    }

    let mut slug = base.clone();
    let mut counter = 1;
    while queries::slug_exists(conn, &slug, exclude_id)? {
        slug = format!("{base}-{counter}");
        counter += 1;
    }
    Ok(slug)
}

/// Creates the business and promotes its creator to OWNER in one
/// transaction.
pub fn create_business(
    conn: &mut Connection,
    input: NewBusiness,
    owner_id: &str,
) -> Result<Business, AppError> {
    let tx = conn.transaction()?;

    queries::get_user_by_id(&tx, owner_id)?
        .ok_or_else(|| AppError::NotFound("owner not found".to_string()))?;

    let slug = unique_slug(&tx, &input.name, None)?;
    let business = Business {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        slug,
        address: input.address,
        description: input.description,
        owner_id: owner_id.to_string(),
        created_at: Utc::now().naive_utc(),
    };
    queries::create_business(&tx, &business)?;
    queries::set_user_role(&tx, owner_id, Role::Owner)?;

    tx.commit()?;
    Ok(business)
}

/// Tenant resolution: a UUID-shaped string is an id, anything else a slug.
pub fn get_business_by_id_or_slug(conn: &Connection, id_or_slug: &str) -> Result<Business, AppError> {
    let business = if Uuid::parse_str(id_or_slug).is_ok() {
        queries::get_business_by_id(conn, id_or_slug)?
    } else {
        queries::get_business_by_slug(conn, id_or_slug)?
    };
    business.ok_or_else(|| AppError::NotFound("business not found".to_string()))
}

pub fn list_businesses(conn: &Connection) -> Result<Vec<Business>, AppError> {
    Ok(queries::list_businesses(conn)?)
}

/// A rename re-derives the slug under the same reserved/uniqueness rules.
pub fn update_business(
    conn: &Connection,
    id: &str,
    update: BusinessUpdate,
) -> Result<Business, AppError> {
    let mut business = queries::get_business_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("business not found".to_string()))?;

    if let Some(name) = update.name {
        if name != business.name {
            business.slug = unique_slug(conn, &name, Some(id))?;
        }
        business.name = name;
    }
    if update.address.is_some() {
        business.address = update.address;
    }
    if update.description.is_some() {
        business.description = update.description;
    }

    queries::update_business(conn, &business)?;
    Ok(business)
}

pub fn delete_business(conn: &Connection, id: &str) -> Result<(), AppError> {
    if !queries::delete_business(conn, id)? {
        return Err(AppError::NotFound("business not found".to_string()));
    }
    Ok(())
}
