use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingDetails, Business, Role, Service, User, WorkSchedule};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Businesses ──

pub fn create_business(conn: &Connection, business: &Business) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO businesses (id, name, slug, address, description, owner_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            business.id,
            business.name,
            business.slug,
            business.address,
            business.description,
            business.owner_id,
            fmt_dt(&business.created_at),
        ],
    )?;
    Ok(())
}

fn parse_business_row(row: &rusqlite::Row) -> rusqlite::Result<Business> {
    Ok(Business {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        address: row.get(3)?,
        description: row.get(4)?,
        owner_id: row.get(5)?,
        created_at: parse_dt(&row.get::<_, String>(6)?),
    })
}

const BUSINESS_COLS: &str = "id, name, slug, address, description, owner_id, created_at";

pub fn get_business_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Business>> {
    let result = conn.query_row(
        &format!("SELECT {BUSINESS_COLS} FROM businesses WHERE id = ?1"),
        params![id],
        parse_business_row,
    );

    match result {
        Ok(business) => Ok(Some(business)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_business_by_slug(conn: &Connection, slug: &str) -> anyhow::Result<Option<Business>> {
    let result = conn.query_row(
        &format!("SELECT {BUSINESS_COLS} FROM businesses WHERE slug = ?1"),
        params![slug],
        parse_business_row,
    );

    match result {
        Ok(business) => Ok(Some(business)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn slug_exists(conn: &Connection, slug: &str, exclude_id: Option<&str>) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM businesses WHERE slug = ?1 AND id != COALESCE(?2, '')",
        params![slug, exclude_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_businesses(conn: &Connection) -> anyhow::Result<Vec<Business>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUSINESS_COLS} FROM businesses ORDER BY created_at ASC"
    ))?;
    let rows = stmt.query_map([], parse_business_row)?;

    let mut businesses = vec![];
    for row in rows {
        businesses.push(row?);
    }
    Ok(businesses)
}

pub fn update_business(conn: &Connection, business: &Business) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE businesses SET name = ?1, slug = ?2, address = ?3, description = ?4 WHERE id = ?5",
        params![
            business.name,
            business.slug,
            business.address,
            business.description,
            business.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_business(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM businesses WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, phone, role, business_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.name,
            user.email,
            user.phone,
            user.role.as_str(),
            user.business_id,
            fmt_dt(&user.created_at),
        ],
    )?;
    Ok(())
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: Role::parse(&row.get::<_, String>(4)?),
        business_id: row.get(5)?,
        created_at: parse_dt(&row.get::<_, String>(6)?),
    })
}

const USER_COLS: &str = "id, name, email, phone, role, business_id, created_at";

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        params![id],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn email_exists(conn: &Connection, email: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn set_user_role(conn: &Connection, id: &str, role: Role) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET role = ?1 WHERE id = ?2",
        params![role.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn set_user_business(
    conn: &Connection,
    id: &str,
    business_id: Option<&str>,
    role: Role,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET business_id = ?1, role = ?2 WHERE id = ?3",
        params![business_id, role.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn list_employees_by_business(conn: &Connection, business_id: &str) -> anyhow::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLS} FROM users WHERE business_id = ?1 AND role = 'employee' ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(params![business_id], parse_user_row)?;

    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

// ── Services ──

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, business_id, name, description, duration_minutes, price, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            service.id,
            service.business_id,
            service.name,
            service.description,
            service.duration_minutes,
            service.price,
            fmt_dt(&service.created_at),
        ],
    )?;
    Ok(())
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        business_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        duration_minutes: row.get(4)?,
        price: row.get(5)?,
        created_at: parse_dt(&row.get::<_, String>(6)?),
    })
}

const SERVICE_COLS: &str = "id, business_id, name, description, duration_minutes, price, created_at";

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        &format!("SELECT {SERVICE_COLS} FROM services WHERE id = ?1"),
        params![id],
        parse_service_row,
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_services_by_business(conn: &Connection, business_id: &str) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLS} FROM services WHERE business_id = ?1 ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(params![business_id], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2, duration_minutes = ?3, price = ?4 WHERE id = ?5",
        params![
            service.name,
            service.description,
            service.duration_minutes,
            service.price,
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Employee-service assignments ──

pub fn assignment_exists(conn: &Connection, employee_id: &str, service_id: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM employee_services WHERE employee_id = ?1 AND service_id = ?2",
        params![employee_id, service_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn assign_service(conn: &Connection, employee_id: &str, service_id: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO employee_services (employee_id, service_id) VALUES (?1, ?2)",
        params![employee_id, service_id],
    )?;
    Ok(())
}

pub fn unassign_service(conn: &Connection, employee_id: &str, service_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM employee_services WHERE employee_id = ?1 AND service_id = ?2",
        params![employee_id, service_id],
    )?;
    Ok(count > 0)
}

pub fn list_services_for_employee(conn: &Connection, employee_id: &str) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.business_id, s.name, s.description, s.duration_minutes, s.price, s.created_at
         FROM services s
         INNER JOIN employee_services es ON es.service_id = s.id
         WHERE es.employee_id = ?1
         ORDER BY s.name ASC",
    )?;
    let rows = stmt.query_map(params![employee_id], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

// ── Work schedules ──

pub fn create_schedule(conn: &Connection, schedule: &WorkSchedule) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO work_schedules (id, employee_id, day_of_week, start_time, end_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            schedule.id,
            schedule.employee_id,
            schedule.day_of_week,
            schedule.start_time,
            schedule.end_time,
        ],
    )?;
    Ok(())
}

fn parse_schedule_row(row: &rusqlite::Row) -> rusqlite::Result<WorkSchedule> {
    Ok(WorkSchedule {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        day_of_week: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
    })
}

const SCHEDULE_COLS: &str = "id, employee_id, day_of_week, start_time, end_time";

pub fn get_schedule_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<WorkSchedule>> {
    let result = conn.query_row(
        &format!("SELECT {SCHEDULE_COLS} FROM work_schedules WHERE id = ?1"),
        params![id],
        parse_schedule_row,
    );

    match result {
        Ok(schedule) => Ok(Some(schedule)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// First schedule for the weekday. The schema allows at most one per
/// (employee, weekday).
pub fn get_schedule_for_day(
    conn: &Connection,
    employee_id: &str,
    day_of_week: u8,
) -> anyhow::Result<Option<WorkSchedule>> {
    let result = conn.query_row(
        &format!(
            "SELECT {SCHEDULE_COLS} FROM work_schedules
             WHERE employee_id = ?1 AND day_of_week = ?2
             ORDER BY start_time ASC LIMIT 1"
        ),
        params![employee_id, day_of_week],
        parse_schedule_row,
    );

    match result {
        Ok(schedule) => Ok(Some(schedule)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn schedule_exists_for_day(
    conn: &Connection,
    employee_id: &str,
    day_of_week: u8,
    exclude_id: Option<&str>,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM work_schedules
         WHERE employee_id = ?1 AND day_of_week = ?2 AND id != COALESCE(?3, '')",
        params![employee_id, day_of_week, exclude_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_schedules_by_employee(conn: &Connection, employee_id: &str) -> anyhow::Result<Vec<WorkSchedule>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SCHEDULE_COLS} FROM work_schedules WHERE employee_id = ?1 ORDER BY day_of_week ASC"
    ))?;
    let rows = stmt.query_map(params![employee_id], parse_schedule_row)?;

    let mut schedules = vec![];
    for row in rows {
        schedules.push(row?);
    }
    Ok(schedules)
}

pub fn update_schedule(conn: &Connection, schedule: &WorkSchedule) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE work_schedules SET day_of_week = ?1, start_time = ?2, end_time = ?3 WHERE id = ?4",
        params![
            schedule.day_of_week,
            schedule.start_time,
            schedule.end_time,
            schedule.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_schedule(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM work_schedules WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Availability roster ──

/// Employees qualified for a service on a weekday: role EMPLOYEE, assigned
/// to the service, and with a schedule row for that weekday.
pub fn list_employees_for_service_on_day(
    conn: &Connection,
    service_id: &str,
    day_of_week: u8,
) -> anyhow::Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name FROM users u
         WHERE u.role = 'employee'
           AND EXISTS (SELECT 1 FROM employee_services es
                       WHERE es.employee_id = u.id AND es.service_id = ?1)
           AND EXISTS (SELECT 1 FROM work_schedules ws
                       WHERE ws.employee_id = u.id AND ws.day_of_week = ?2)
         ORDER BY u.id ASC",
    )?;
    let rows = stmt.query_map(params![service_id, day_of_week], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut employees = vec![];
    for row in rows {
        employees.push(row?);
    }
    Ok(employees)
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, business_id, employee_id, service_id, customer_id,
                               customer_name, customer_email, customer_phone,
                               start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.business_id,
            booking.employee_id,
            booking.service_id,
            booking.customer_id,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            fmt_dt(&booking.start_time),
            fmt_dt(&booking.end_time),
            fmt_dt(&booking.created_at),
        ],
    )?;
    Ok(())
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        business_id: row.get(1)?,
        employee_id: row.get(2)?,
        service_id: row.get(3)?,
        customer_id: row.get(4)?,
        customer_name: row.get(5)?,
        customer_email: row.get(6)?,
        customer_phone: row.get(7)?,
        start_time: parse_dt(&row.get::<_, String>(8)?),
        end_time: parse_dt(&row.get::<_, String>(9)?),
        created_at: parse_dt(&row.get::<_, String>(10)?),
    })
}

const BOOKING_COLS: &str = "id, business_id, employee_id, service_id, customer_id, \
                            customer_name, customer_email, customer_phone, \
                            start_time, end_time, created_at";

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Bookings whose start falls within `[start, end)`. The stored format
/// compares correctly as text.
pub fn get_employee_bookings_in_range(
    conn: &Connection,
    employee_id: &str,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings
         WHERE employee_id = ?1 AND start_time >= ?2 AND start_time < ?3
         ORDER BY start_time ASC"
    ))?;
    let rows = stmt.query_map(
        params![employee_id, fmt_dt(start), fmt_dt(end)],
        parse_booking_row,
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// Half-open overlap count for conflict arbitration. Must stay in lockstep
/// with `services::slots::overlaps`.
pub fn count_overlapping_bookings(
    conn: &Connection,
    employee_id: &str,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE employee_id = ?1 AND start_time < ?2 AND end_time > ?3",
        params![employee_id, fmt_dt(end), fmt_dt(start)],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn list_bookings_by_business(conn: &Connection, business_id: &str) -> anyhow::Result<Vec<BookingDetails>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.business_id, b.employee_id, b.service_id, b.customer_id,
                b.customer_name, b.customer_email, b.customer_phone,
                b.start_time, b.end_time, b.created_at,
                s.name, s.price, e.name
         FROM bookings b
         INNER JOIN services s ON s.id = b.service_id
         INNER JOIN users e ON e.id = b.employee_id
         WHERE b.business_id = ?1
         ORDER BY b.start_time ASC",
    )?;
    let rows = stmt.query_map(params![business_id], |row| {
        Ok(BookingDetails {
            booking: parse_booking_row(row)?,
            service_name: row.get(11)?,
            service_price: row.get(12)?,
            employee_name: row.get(13)?,
        })
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

// ── Dashboard ──

pub struct DashboardStats {
    pub total_bookings: i64,
    pub total_revenue: f64,
    pub bookings_per_employee: Vec<(String, String, i64)>,
    pub most_popular_services: Vec<(String, String, i64)>,
}

pub fn get_dashboard_stats(conn: &Connection, business_id: &str) -> anyhow::Result<DashboardStats> {
    let total_bookings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE business_id = ?1",
        params![business_id],
        |row| row.get(0),
    )?;

    let total_revenue: f64 = conn.query_row(
        "SELECT COALESCE(SUM(s.price), 0)
         FROM bookings b INNER JOIN services s ON s.id = b.service_id
         WHERE b.business_id = ?1",
        params![business_id],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT b.employee_id, e.name, COUNT(*) as bookings
         FROM bookings b INNER JOIN users e ON e.id = b.employee_id
         WHERE b.business_id = ?1
         GROUP BY b.employee_id
         ORDER BY bookings DESC",
    )?;
    let rows = stmt.query_map(params![business_id], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?;
    let mut bookings_per_employee = vec![];
    for row in rows {
        bookings_per_employee.push(row?);
    }

    let mut stmt = conn.prepare(
        "SELECT b.service_id, s.name, COUNT(*) as bookings
         FROM bookings b INNER JOIN services s ON s.id = b.service_id
         WHERE b.business_id = ?1
         GROUP BY b.service_id
         ORDER BY bookings DESC
         LIMIT 5",
    )?;
    let rows = stmt.query_map(params![business_id], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?;
    let mut most_popular_services = vec![];
    for row in rows {
        most_popular_services.push(row?);
    }

    Ok(DashboardStats {
        total_bookings,
        total_revenue,
        bookings_per_employee,
        most_popular_services,
    })
}
