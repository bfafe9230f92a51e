//! MySQL connection implementation

use async_trait::async_trait;
use mysql_async::{
    Conn, Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row as MySqlRow, consts::ColumnType,
    prelude::*,
};
use tablewright_core::{
    ColumnMeta, Connection, CoreError, QueryResult, Result, Row, SchemaIntrospection,
    StatementResult, Value,
};

/// Parameters needed to open a MySQL connection
#[derive(Debug, Clone)]
pub struct MySqlConnectOptions {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl Default for MySqlConnectOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: None,
            password: None,
            database: None,
        }
    }
}

/// MySQL connection wrapper
///
/// Holds a single-connection pool so that every statement of an editing
/// session runs on the same server session.
pub struct MySqlConnection {
    pool: Pool,
    /// Resolved at connect time so callers that pass no database can still
    /// address `information_schema` with a concrete schema name.
    database_name: Option<String>,
    /// MariaDB reports `COLUMN_DEFAULT` as SQL text rather than a bare value
    is_mariadb: bool,
}

impl MySqlConnection {
    /// Connect to a MySQL database
    pub async fn connect(options: &MySqlConnectOptions) -> Result<Self> {
        tracing::info!(
            host = %options.host,
            port = %options.port,
            database = ?options.database,
            "connecting to MySQL database"
        );

        let mut opts_builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(options.host.clone())
            .tcp_port(options.port);

        if let Some(ref db) = options.database {
            opts_builder = opts_builder.db_name(Some(db.clone()));
        }
        if let Some(ref u) = options.user {
            opts_builder = opts_builder.user(Some(u.clone()));
        }
        if let Some(ref p) = options.password {
            opts_builder = opts_builder.pass(Some(p.clone()));
        }

        let constraints = PoolConstraints::new(1, 1).ok_or_else(|| {
            CoreError::Connection("Failed to configure MySQL pool constraints (min=1, max=1)".into())
        })?;
        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_reset_connection(false);
        opts_builder = opts_builder.pool_opts(pool_opts);

        let pool = Pool::new(Opts::from(opts_builder));

        // Verify connectivity, resolve the active database and identify the
        // server flavour in one round trip
        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| CoreError::Connection(format!("Failed to connect to MySQL: {}", e)))?;
        let row: Option<(Option<String>, String)> = conn
            .query_first("SELECT DATABASE(), VERSION()")
            .await
            .map_err(map_mysql_error)?;
        drop(conn);

        let (selected, version) = row.unwrap_or_default();
        let database_name = options.database.clone().or(selected);
        let is_mariadb = is_mariadb_version(&version);

        tracing::info!(
            host = %options.host,
            port = %options.port,
            database = ?database_name,
            server_version = %version,
            "MySQL connection established"
        );
        Ok(Self {
            pool,
            database_name,
            is_mariadb,
        })
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<Conn> {
        self.pool
            .get_conn()
            .await
            .map_err(|e| CoreError::Connection(format!("Failed to get MySQL connection: {}", e)))
    }

    /// Returns the database selected at connect time, if any.
    pub fn default_database(&self) -> Option<&str> {
        self.database_name.as_deref()
    }

    pub fn is_mariadb(&self) -> bool {
        self.is_mariadb
    }
}

/// Translate a driver error, keeping the server's own wording for rejected statements.
fn map_mysql_error(error: mysql_async::Error) -> CoreError {
    match error {
        mysql_async::Error::Server(server) => CoreError::Query(format!(
            "ERROR {} ({}): {}",
            server.code, server.state, server.message
        )),
        mysql_async::Error::Io(io) => CoreError::Connection(io.to_string()),
        mysql_async::Error::Driver(driver) => CoreError::Connection(driver.to_string()),
        other => CoreError::Query(other.to_string()),
    }
}

/// Convert a mysql_async value to our Value type, using column type metadata
/// to interpret byte strings from the text protocol.
fn mysql_value_to_value(val: mysql_async::Value, col_type: ColumnType) -> Value {
    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => match col_type {
                ColumnType::MYSQL_TYPE_TINY
                | ColumnType::MYSQL_TYPE_SHORT
                | ColumnType::MYSQL_TYPE_LONG
                | ColumnType::MYSQL_TYPE_LONGLONG
                | ColumnType::MYSQL_TYPE_INT24
                | ColumnType::MYSQL_TYPE_YEAR => match s.parse::<i64>() {
                    Ok(v) => Value::Int64(v),
                    Err(_) => s.parse::<u64>().map(Value::UInt64).unwrap_or(Value::String(s)),
                },
                ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
                    s.parse::<f64>().map(Value::Float64).unwrap_or(Value::String(s))
                }
                ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                    Value::Decimal(s)
                }
                _ => Value::String(s),
            },
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => match i64::try_from(u) {
            Ok(v) => Value::Int64(v),
            Err(_) => Value::UInt64(u),
        },
        mysql_async::Value::Float(f) => Value::Float64(f as f64),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                match date {
                    Some(date) => Value::Date(date),
                    None => Value::String(format!("{:04}-{:02}-{:02}", year, month, day)),
                }
            } else {
                match date.and_then(|d| {
                    d.and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro)
                }) {
                    Some(dt) => Value::DateTime(dt),
                    None => Value::String(format!(
                        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                        year, month, day, hour, min, sec
                    )),
                }
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + hours as u32;
            let sign = if negative { "-" } else { "" };
            Value::String(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                sign, total_hours, mins, secs, micros
            ))
        }
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        let mut conn = self.get_conn().await?;

        conn.query_drop(sql).await.map_err(map_mysql_error)?;
        let affected_rows = conn.affected_rows();

        tracing::debug!(affected_rows = affected_rows, "statement executed");
        Ok(StatementResult { affected_rows })
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str) -> Result<QueryResult> {
        let start_time = std::time::Instant::now();
        let mut conn = self.get_conn().await?;

        let mysql_rows: Vec<MySqlRow> = conn.query(sql).await.map_err(map_mysql_error)?;

        let mut columns = Vec::new();
        let mut column_names = Vec::new();
        let mut column_types = Vec::new();

        if let Some(first_row) = mysql_rows.first() {
            for (idx, col) in first_row.columns_ref().iter().enumerate() {
                let name = col.name_str().to_string();
                column_names.push(name.clone());
                column_types.push(col.column_type());
                columns.push(ColumnMeta {
                    name,
                    data_type: format!("{:?}", col.column_type()),
                    ordinal: idx,
                });
            }
        }

        let rows = mysql_rows
            .into_iter()
            .map(|mut mysql_row| {
                let values = (0..columns.len())
                    .map(|idx| {
                        let mysql_val = mysql_row
                            .take::<mysql_async::Value, usize>(idx)
                            .unwrap_or(mysql_async::Value::NULL);
                        let col_type = column_types
                            .get(idx)
                            .copied()
                            .unwrap_or(ColumnType::MYSQL_TYPE_STRING);
                        mysql_value_to_value(mysql_val, col_type)
                    })
                    .collect();
                Row::new(column_names.clone(), values)
            })
            .collect::<Vec<_>>();

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms = execution_time_ms,
            "query executed successfully"
        );

        Ok(QueryResult {
            id: uuid::Uuid::new_v4(),
            columns,
            rows,
            execution_time_ms,
        })
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing MySQL connection pool");
        self.pool
            .clone()
            .disconnect()
            .await
            .map_err(|e| CoreError::Connection(format!("Failed to close MySQL connection: {}", e)))
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

fn is_mariadb_version(version: &str) -> bool {
    version.to_ascii_lowercase().contains("mariadb")
}
