// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: CSV → 标准化记录 → 分桶 → 持久化
// ==========================================

mod test_helpers;

use std::sync::Arc;

use tempfile::TempDir;
use test_helpers::{create_test_db, fixture_path, sample_row, write_csv, SAMPLE_HEADERS};
use wika_stock_dashboard::config::ConfigManager;
use wika_stock_dashboard::domain::types::Bucket;
use wika_stock_dashboard::importer::{
    FieldMapperImpl, ImportError, StockImporter, StockImporterImpl, UniversalFileParser,
};
use wika_stock_dashboard::repository::{CachedStockRepository, SqliteStockStorage, StockRepository};

fn build_importer(
    db_path: &str,
) -> (
    StockImporterImpl<CachedStockRepository, ConfigManager>,
    Arc<CachedStockRepository>,
) {
    let config = Arc::new(ConfigManager::new(db_path).expect("Failed to create ConfigManager"));
    let storage =
        SqliteStockStorage::new(db_path, "wika-data").expect("Failed to create storage");
    let repo = Arc::new(CachedStockRepository::new(Arc::new(storage)));

    let importer = StockImporterImpl::new(
        repo.clone(),
        config,
        Box::new(UniversalFileParser),
        Box::new(FieldMapperImpl::default()),
    );
    (importer, repo)
}

#[tokio::test]
async fn test_import_sample_csv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, repo) = build_importer(&db_path);

    let outcome = importer
        .import_from_csv(fixture_path("stock_sample.csv"))
        .await
        .expect("Import should succeed");

    let summary = &outcome.summary;
    assert_eq!(summary.sheet_name, "stock_sample");
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.skipped_blank_rows, 1);
    assert_eq!(summary.unclassified_rows, 1);
    assert_eq!(summary.unknown_headers, vec!["CATATAN GUDANG".to_string()]);
    assert!(summary.storage_warnings.is_empty());

    // 每个桶都有条目（含空桶）
    assert_eq!(summary.bucket_counts.len(), Bucket::ALL.len());
    assert_eq!(summary.bucket_counts[&Bucket::Ok], 2);
    assert_eq!(summary.bucket_counts[&Bucket::Produksi], 1);
    assert_eq!(summary.bucket_counts[&Bucket::Distribusi], 1);
    assert_eq!(summary.bucket_counts[&Bucket::Site], 0);

    // 仓储中按原始行序保存
    let ok = repo.get(Bucket::Ok).unwrap();
    let npps: Vec<&str> = ok.iter().map(|r| r.npp.as_str()).collect();
    assert_eq!(npps, vec!["N001", "N003"]);
}

#[tokio::test]
async fn test_import_normalizes_fields() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, _repo) = build_importer(&db_path);

    let outcome = importer
        .import_from_csv(fixture_path("stock_sample.csv"))
        .await
        .unwrap();

    let n001 = &outcome.buckets[&Bucket::Ok][0];
    assert_eq!(n001.sbu, "BR");
    assert_eq!(n001.ppb, "BGR");
    assert_eq!(n001.area, "JABAR");
    assert_eq!(n001.kategori, "TIANG");
    assert_eq!(n001.pelanggan, "PT Adhi");
    assert_eq!(n001.tahun, 2021);
    assert_eq!(n001.range_umur, "2–3 tahun");
    assert_eq!(n001.stok_ok, 10.0);
    assert_eq!(n001.extras.get("catatan_gudang").map(String::as_str), Some("rak 1"));

    // 空年份 → 0
    let n003 = &outcome.buckets[&Bucket::Ok][1];
    assert_eq!(n003.tahun, 0);
    assert_eq!(n003.sbu, "ZZ");
    assert!(n003.extras.is_empty());

    // "N/A" 视为 0，不触发 OK 桶；生产桶由 STOK PRODUKSI 触发
    let n002 = &outcome.buckets[&Bucket::Produksi][0];
    assert_eq!(n002.npp, "N002");
    assert_eq!(n002.stok_ok, 0.0);
    assert_eq!(n002.stok_produksi_saat_ini, 4.0);
}

#[tokio::test]
async fn test_reupload_replaces_all_buckets() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, repo) = build_importer(&db_path);
    let dir = TempDir::new().unwrap();

    let first = write_csv(
        &dir,
        "first.csv",
        SAMPLE_HEADERS,
        &[
            sample_row("A1", "2020", "BR", "BGR", "5", "500"),
            sample_row("A2", "2021", "HD", "BYL", "3", "300"),
        ],
    )
    .unwrap();
    importer.import_from_csv(&first).await.unwrap();
    assert_eq!(repo.get(Bucket::Ok).unwrap().len(), 2);

    // 第二次上传没有 OK 桶记录
    let mut second_row = sample_row("B1", "2022", "MR", "MJK", "0", "0");
    second_row[16] = "2"; // STOK PRODUKSI LALU
    let second = write_csv(&dir, "second.csv", SAMPLE_HEADERS, &[second_row]).unwrap();
    importer.import_from_csv(&second).await.unwrap();

    assert!(repo.get(Bucket::Ok).unwrap().is_empty());
    let produksi = repo.get(Bucket::Produksi).unwrap();
    assert_eq!(produksi.len(), 1);
    assert_eq!(produksi[0].npp, "B1");

    // 新建仓储从数据库重新加载，同样看不到第一次的数据
    let (_fresh_importer, fresh_repo) = build_importer(&db_path);
    assert!(fresh_repo.get(Bucket::Ok).unwrap().is_empty());
    assert_eq!(fresh_repo.get(Bucket::Produksi).unwrap()[0].npp, "B1");
}

#[tokio::test]
async fn test_missing_columns_keeps_previous_data() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, repo) = build_importer(&db_path);

    importer
        .import_from_csv(fixture_path("stock_sample.csv"))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let headers: Vec<&str> = SAMPLE_HEADERS
        .iter()
        .copied()
        .filter(|h| *h != "HARSAT" && *h != "KETERANGAN")
        .collect();
    let path = write_csv(&dir, "broken.csv", &headers, &[vec!["X"; headers.len()]]).unwrap();

    let err = importer.import_from_csv(&path).await.unwrap_err();
    match err {
        ImportError::MissingColumns { columns, .. } => {
            assert!(columns.contains(&"HARSAT".to_string()));
            assert!(columns.contains(&"KETERANGAN".to_string()));
        }
        other => panic!("Expected MissingColumns, got {:?}", other),
    }

    // 中止的上传不改动已有数据
    assert_eq!(repo.get(Bucket::Ok).unwrap().len(), 2);
}

#[tokio::test]
async fn test_header_only_csv_is_empty_sheet() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, _repo) = build_importer(&db_path);
    let dir = TempDir::new().unwrap();

    let path = write_csv(&dir, "empty.csv", SAMPLE_HEADERS, &[]).unwrap();
    let err = importer.import_from_csv(&path).await.unwrap_err();
    assert!(matches!(err, ImportError::EmptySheet { .. }));
}

#[tokio::test]
async fn test_unsupported_extension() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (importer, _repo) = build_importer(&db_path);
    let dir = TempDir::new().unwrap();

    let path = dir.path().join("stock.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let err = importer.import_file(&path, None).await.unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
