// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成大规模库存 CSV，用于手工验证与性能观察
// 输出: tests/fixtures/datasets/stock_<行数>.csv
// 用法: cargo run --bin generate_test_data -- [行数]
// ==========================================

use chrono::{Datelike, Local};
use csv::Writer;
use std::error::Error;
use std::fs;

const SBUS: &[&str] = &["BR", "HD", "MR", "PI", "PO", "RT", "RY"];
const PPBS: &[&str] = &["BGR", "BYL", "MJK", "PSR"];
const AREAS: &[&str] = &["JABAR", "JATENG", "JATIM", "BALI", "NTT", "NTB"];
const RANGES: &[&str] = &["0–1 tahun", "2–3 tahun", "4–5 tahun", "6–7 tahun", "> 8 tahun"];

// 指标列（与看板模板一致）
const METRIC_HEADERS: &[&str] = &[
    "STOK OK",
    "SALDO OK",
    "STOK SPPRB",
    "SALDO SPPRB",
    "STOK PRODUKSI LALU",
    "STOK PRODUKSI SAAT INI",
    "STOK DISTRIBUSI",
    "SALDO DISTRIBUSI",
    "MUTASI STOK DISTRIBUSI",
    "MUTASI SALDO DISTRIBUSI",
    "STOK LANCAR",
    "SALDO LANCAR",
    "STOK BEBAS",
    "SALDO BEBAS",
    "STOK TITIPAN PERCEPATAN",
    "SALDO TITIPAN PERCEPATAN",
    "MUTASI STOK TITIPAN PERCEPATAN",
    "MUTASI SALDO TITIPAN PERCEPATAN",
    "STOK TITIPAN MURNI",
    "SALDO TITIPAN MURNI",
    "MUTASI STOK TITIPAN MURNI",
    "MUTASI SALDO TITIPAN MURNI",
    "STOK OP",
    "SALDO OP",
    "STOK PPB",
    "SALDO PPB",
    "STOK SITE",
    "SALDO SITE",
];

const COMMON_HEADERS: &[&str] = &[
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
];

/// 线性同余序列，保证每次生成结果一致
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next() as usize) % items.len()]
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn generate(rows: usize, path: &str) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    let mut rng = Lcg(20240601);
    let current_year = Local::now().year();

    let headers: Vec<&str> = COMMON_HEADERS
        .iter()
        .chain(METRIC_HEADERS.iter())
        .copied()
        .collect();
    writer.write_record(&headers)?;

    for i in 0..rows {
        let umur = rng.below(10);
        let harsat = 500 + rng.below(5000);
        // 约 5% 的行年份为空，约 3% 的行事业部不在值域内
        let tahun = if rng.below(20) == 0 {
            String::new()
        } else {
            (2018 + rng.below((current_year - 2017) as u64) as i32).to_string()
        };
        let sbu = if rng.below(33) == 0 {
            "XX".to_string()
        } else {
            rng.pick(SBUS).to_string()
        };

        let mut record = vec![
            format!("NPP-{:06}", i + 1),
            tahun,
            "TIANG".to_string(),
            format!("WP{}", 1 + rng.below(3)),
            rng.pick(PPBS).to_string(),
            sbu,
            rng.pick(AREAS).to_string(),
            format!("PT Pelanggan {}", rng.below(40)),
            format!("Proyek {}", rng.below(120)),
            format!("T-{}", 100 * (1 + rng.below(9))),
            harsat.to_string(),
            umur.to_string(),
            RANGES[(umur as usize / 2).min(RANGES.len() - 1)].to_string(),
            String::new(),
        ];

        // 每行只激活少数指标
        for header in METRIC_HEADERS {
            let active = rng.below(6) == 0;
            let value = if !active {
                0
            } else if header.starts_with("MUTASI") {
                rng.below(21) as i64 - 10
            } else {
                1 + rng.below(50) as i64
            };
            let value = if header.starts_with("SALDO") || header.starts_with("MUTASI SALDO") {
                value * harsat as i64
            } else {
                value
            };
            record.push(value.to_string());
        }

        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let rows: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);

    let dir = "tests/fixtures/datasets";
    fs::create_dir_all(dir)?;
    let path = format!("{}/stock_{}.csv", dir, rows);

    println!("生成 {} 行库存数据 → {}", rows, path);
    generate(rows, &path)?;
    println!("完成");
    Ok(())
}
