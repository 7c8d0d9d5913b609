//! Integration tests for relgen against a MySQL testcontainer
//!
//! These tests cover the full stack: connection handling, the
//! `INFORMATION_SCHEMA` catalog queries, relationship derivation and file
//! generation, using a real MySQL server loaded with `fixtures/shop.sql`.
//!
//! A single container is shared across all tests. It is started lazily by the
//! first test that needs it, so the suite needs a Docker daemon and is ignored
//! by default: run it with `cargo test -p relgen-tests -- --ignored`.
//!
//! Container cleanup:
//! - The `watchdog` feature handles cleanup on CTRL+C or SIGTERM signals
//! - For normal process exit, `shutdown_hooks` signals the container thread to stop
//! - The container lives inside that thread, so it's dropped when the thread exits

use serial_test::serial;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use testcontainers::runners::SyncRunner;
use testcontainers::Container;
use testcontainers_modules::mysql::Mysql;

use relgen_catalog::{MySqlConnection, Query};
use relgen_codegen::config::{ConnectionParams, Password, TableFilter};
use relgen_codegen::introspect::{introspect, read_schema, DdlCatalog, SchemaGraph};
use relgen_codegen::{CodegenBuilder, CodegenError};

const SCHEMA: &str = include_str!("../fixtures/shop.sql");
const DATABASE: &str = "test";

// Host port of the running container
static DB_PORT: OnceLock<u16> = OnceLock::new();
// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Cleanup function called on process exit.
/// Signals the container thread to stop and gives it time to finish.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(500));
}

fn start_container() -> u16 {
    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    // Channel for signaling when the container is ready
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    thread::spawn(move || {
        let container: Container<Mysql> = Mysql::default().start().unwrap();
        let port = container.get_host_port_ipv4(3306).unwrap();

        let mut conn = connect(port);
        for stmt in SCHEMA
            .split(';')
            .map(strip_comments)
            .filter(|s| !s.is_empty())
        {
            Query::new(&stmt).execute(&mut conn).unwrap();
        }
        conn.close().unwrap();

        ready_tx.send(port).unwrap();

        // Keep container alive until shutdown is signaled.
        while !SHUTDOWN.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
        }
        drop(container);
    });

    ready_rx.recv().unwrap()
}

fn strip_comments(stmt: &str) -> String {
    stmt.lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn db_port() -> u16 {
    *DB_PORT.get_or_init(start_container)
}

fn connect(port: u16) -> MySqlConnection {
    MySqlConnection::builder("127.0.0.1", DATABASE)
        .port(port)
        .user("root")
        .password("")
        .connect()
        .unwrap()
}

fn params(port: u16) -> ConnectionParams {
    ConnectionParams {
        host: "127.0.0.1".to_string(),
        port,
        database: DATABASE.to_string(),
        user: "root".to_string(),
        password: Password::new(""),
        charset: "utf8mb4".to_string(),
    }
}

fn live_graph() -> SchemaGraph {
    introspect(&params(db_port()), &TableFilter::default()).unwrap()
}

fn names(graph: &SchemaGraph) -> Vec<&str> {
    graph.tables().iter().map(|t| t.name.as_str()).collect()
}

// ============================================================================
// Catalog queries
// ============================================================================

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_tables_are_listed_by_name() {
    let graph = live_graph();
    assert_eq!(
        names(&graph),
        vec![
            "audit_log",
            "categories",
            "order_items",
            "orders",
            "products",
            "users"
        ]
    );
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_columns_in_ordinal_order() {
    let graph = live_graph();
    let users = graph.get("users").unwrap();

    let columns: Vec<&str> = users.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "email", "display_name", "status"]);

    let email = users.get_column("email").unwrap();
    assert_eq!(email.data_type, "varchar");
    assert!(!email.nullable);

    let display_name = users.get_column("display_name").unwrap();
    assert!(display_name.nullable);
    assert_eq!(display_name.default_value, None);

    let status = users.get_column("status").unwrap();
    assert_eq!(status.default_value.as_deref(), Some("active"));
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_primary_keys() {
    let graph = live_graph();
    assert_eq!(graph.get("users").unwrap().primary_key, "id");
    // no primary key declared
    assert_eq!(graph.get("audit_log").unwrap().primary_key, "id");
}

// ============================================================================
// Relationship derivation
// ============================================================================

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_foreign_keys_become_relations() {
    let graph = live_graph();

    let items = graph.get("order_items").unwrap();
    let targets: Vec<&str> = items
        .relationships
        .belongs_to
        .iter()
        .map(|r| r.target_table.as_str())
        .collect();
    assert_eq!(targets, vec!["orders", "products"]);
    assert!(items.relationships.has_many.is_empty());

    let orders = graph.get("orders").unwrap();
    assert_eq!(orders.relationships.has_many.len(), 1);
    assert_eq!(orders.relationships.has_many[0].target_table, "order_items");
    assert_eq!(orders.relationships.has_many[0].foreign_key, "order_id");
    assert_eq!(orders.relationships.has_many[0].local_key, "id");

    assert!(graph.get("audit_log").unwrap().relationships.is_empty());
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_self_reference() {
    let graph = live_graph();
    let categories = graph.get("categories").unwrap();

    assert_eq!(categories.relationships.belongs_to.len(), 1);
    assert_eq!(categories.relationships.belongs_to[0].target_table, "categories");
    assert_eq!(categories.relationships.belongs_to[0].foreign_key, "parent_id");

    let children: Vec<&str> = categories
        .relationships
        .has_many
        .iter()
        .map(|r| r.target_table.as_str())
        .collect();
    assert_eq!(children, vec!["categories", "products"]);
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_live_catalog_agrees_with_ddl() {
    let live = live_graph();
    let mut ddl = DdlCatalog::from_sql(SCHEMA).unwrap();
    let offline = read_schema(&mut ddl, &TableFilter::default()).unwrap();

    assert_eq!(names(&live), names(&offline));
    for table in offline.tables() {
        let other = live.get(&table.name).unwrap();
        assert_eq!(table.primary_key, other.primary_key, "{}", table.name);
        assert_eq!(table.foreign_keys, other.foreign_keys, "{}", table.name);
        assert_eq!(table.relationships, other.relationships, "{}", table.name);
    }
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_filtered_introspection() {
    let port = db_port();

    let filter = TableFilter::new("users,orders", "");
    let graph = introspect(&params(port), &filter).unwrap();
    assert_eq!(names(&graph), vec!["orders", "users"]);

    // orders references users, which the filter keeps
    let filter = TableFilter::new("*", "users");
    let err = introspect(&params(port), &filter).unwrap_err();
    assert!(matches!(err, CodegenError::Introspection(ref m) if m.contains("users")));
}

// ============================================================================
// Connection failures
// ============================================================================

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_wrong_password_is_connection_error() {
    let mut params = params(db_port());
    params.password = Password::new("not-the-password");

    let err = introspect(&params, &TableFilter::default()).unwrap_err();
    assert_eq!(err.kind(), "ConnectionError");
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_unknown_database_is_connection_error() {
    let mut params = params(db_port());
    params.database = "no_such_db".to_string();

    let err = introspect(&params, &TableFilter::default()).unwrap_err();
    assert!(matches!(err, CodegenError::Connection(_)));
}

// ============================================================================
// End-to-end generation
// ============================================================================

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_generate_from_database() {
    let port = db_port();
    let dir = tempfile::tempdir().unwrap();

    let report = CodegenBuilder::new(dir.path(), "App")
        .database("127.0.0.1", DATABASE, "root", "")
        .port(port)
        .generate()
        .unwrap();

    assert_eq!(report.models.len(), 6);
    assert_eq!(report.services.len(), 6);

    let order = fs::read_to_string(dir.path().join("Models/Order.php")).unwrap();
    assert!(order.contains("public function user()"));
    assert!(order.contains("return $this->belongsTo(\\App\\Models\\User::class, 'user_id', 'id');"));
    assert!(order.contains("public function orderItems()"));
    assert!(order.contains("return $this->hasMany(\\App\\Models\\OrderItem::class, 'order_id', 'id');"));

    // naive singularization: one trailing "s" is dropped
    let category = fs::read_to_string(dir.path().join("Models/Categorie.php")).unwrap();
    assert!(category.contains("public function categorie()"));
    assert!(category.contains("public function categories()"));
    assert!(category.contains("public function products()"));

    let service = fs::read_to_string(dir.path().join("Services/OrderService.php")).unwrap();
    assert!(service.contains("protected array $relationships = ['user','orderItems'];"));
    assert!(service.contains("$model->orderItems()->createMany($data['orderItems']);"));
    assert!(!service.contains("$model->user()->delete();"));

    let audit = fs::read_to_string(dir.path().join("Models/AuditLog.php")).unwrap();
    assert!(!audit.contains("public function"));
}

#[test]
#[serial]
#[ignore = "requires a Docker daemon"]
fn test_graph_serializes_to_json() {
    let graph = live_graph();
    let json = serde_json::to_value(&graph).unwrap();

    let tables = json["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 6);
    assert_eq!(tables[0]["name"], "audit_log");
    assert!(json.get("index").is_none());
}
