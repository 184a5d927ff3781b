use rusqlite::{params, Connection};
use serde_json::Value;
use vista_core::query::QueryParams;
use vista_core_types::RequestContext;
use vista_engine::{apply_api_query, ApiQuery, ApiQueryResult, Catalog};
use vista_store::schema::civic_schema;

/// Migrated in-memory database with `people` people, two organizations and
/// one membership per person.
///
/// Person `n` is named `Person n` and was created `n` minutes after
/// 2020-01-01, so `-created_at` reverses id order. Odd ids sit in the
/// Senate (organization 2, child of Parliament), even ids in Parliament.
#[allow(dead_code)]
pub fn civic_db(people: usize) -> Connection {
    let mut conn = vista_store::db::open_in_memory().expect("Failed to create in-memory database");
    vista_store::db::configure(&conn).unwrap();
    vista_store::migrations::apply_migrations(&mut conn).unwrap();

    let tx = conn.transaction().unwrap();
    tx.execute(
        "INSERT INTO organizations (id, name, classification, parent_id) VALUES (1, 'Parliament', 'legislature', NULL)",
        [],
    )
    .unwrap();
    tx.execute(
        "INSERT INTO organizations (id, name, classification, parent_id) VALUES (2, 'Senate', 'chamber', 1)",
        [],
    )
    .unwrap();
    for n in 1..=people as i64 {
        let created_at = format!(
            "2020-01-01T{:02}:{:02}:00Z",
            n / 60,
            n % 60
        );
        tx.execute(
            "INSERT INTO people (id, name, sort_name, gender, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                n,
                format!("Person {}", n),
                format!("{:04}", n),
                if n % 2 == 0 { "female" } else { "male" },
                created_at
            ],
        )
        .unwrap();
        tx.execute(
            "INSERT INTO memberships (id, person_id, organization_id, role) VALUES (?1, ?1, ?2, 'member')",
            params![n, if n % 2 == 0 { 1 } else { 2 }],
        )
        .unwrap();
    }
    tx.commit().unwrap();
    conn
}

#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> QueryParams {
    pairs.iter().copied().collect()
}

#[allow(dead_code)]
pub fn list(conn: &Connection, endpoint: &str, pairs: &[(&str, &str)]) -> ApiQueryResult {
    let query = ApiQuery::List {
        endpoint: endpoint.to_string(),
        params: params(pairs),
    };
    run(conn, query)
}

#[allow(dead_code)]
pub fn detail(conn: &Connection, endpoint: &str, id: &str, pairs: &[(&str, &str)]) -> ApiQueryResult {
    let query = ApiQuery::Detail {
        endpoint: endpoint.to_string(),
        id: id.to_string(),
        params: params(pairs),
    };
    run(conn, query)
}

fn run(conn: &Connection, query: ApiQuery) -> ApiQueryResult {
    let catalog = Catalog::civic().unwrap();
    apply_api_query(query, conn, &civic_schema(), &catalog, RequestContext::new())
}

/// `results[i].id` for every result
#[allow(dead_code)]
pub fn result_ids(body: &Value) -> Vec<i64> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}
