// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试文件生成等功能
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::{NamedTempFile, TempDir};
use wika_stock_dashboard::app::AppState;
use wika_stock_dashboard::db::{configure_sqlite_connection, init_schema};

/// 样例工作簿的表头（必需列 + 部分指标列 + 一个未识别列）
pub const SAMPLE_HEADERS: &[&str] = &[
    "NPP",
    "TAHUN",
    "KATEGORI",
    "WP",
    "PPB",
    "SBU",
    "AREA",
    "PELANGGAN",
    "PROYEK",
    "TYPE",
    "HARSAT",
    "UMUR STOK",
    "RANGE UMUR",
    "KETERANGAN",
    "STOK OK",
    "SALDO OK",
    "STOK PRODUKSI LALU",
    "STOK PRODUKSI SAAT INI",
    "STOK DISTRIBUSI",
    "SALDO DISTRIBUSI",
    "MUTASI STOK DISTRIBUSI",
    "MUTASI SALDO DISTRIBUSI",
    "CATATAN GUDANG",
];

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 写入全局配置
pub fn insert_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

/// 基于临时数据库创建 AppState
pub async fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::new(db_path).await?;
    Ok((temp_file, state))
}

/// 仓库内样例 CSV 路径
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 在临时目录写入 CSV 文件
pub fn write_csv(
    dir: &TempDir,
    file_name: &str,
    headers: &[&str],
    rows: &[Vec<&str>],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(file_name);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// 构造一行样例数据（按 SAMPLE_HEADERS 顺序）
///
/// 未给出的指标列填 "0"。
pub fn sample_row<'a>(
    npp: &'a str,
    tahun: &'a str,
    sbu: &'a str,
    ppb: &'a str,
    stok_ok: &'a str,
    saldo_ok: &'a str,
) -> Vec<&'a str> {
    vec![
        npp, tahun, "TIANG", "WP1", ppb, sbu, "JABAR", "PT Uji", "Proyek Uji", "T-600", "1000",
        "1", "0–1 tahun", "", stok_ok, saldo_ok, "0", "0", "0", "0", "0", "0", "",
    ]
}
