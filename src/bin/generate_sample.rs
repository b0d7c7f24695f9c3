//! Writes `sample_data.csv` and `sample_data.parquet`: a synthetic health
//! survey with numeric, text, boolean and date columns and scattered
//! missing values.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 300;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `None` with probability `p`.
    fn maybe<T>(&mut self, p: f64, value: T) -> Option<T> {
        (self.next_f64() >= p).then_some(value)
    }
}

struct Row {
    id: i64,
    age: Option<f64>,
    height_cm: f64,
    weight_kg: Option<f64>,
    systolic: Option<f64>,
    group: Option<&'static str>,
    smoker: bool,
    visit_date: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let groups = ["control", "treatment_a", "treatment_b"];
    (0..ROWS)
        .map(|i| {
            let age = (rng.gauss(45.0, 14.0)).clamp(18.0, 90.0).round();
            let height = rng.gauss(171.0, 9.0);
            // weight tracks height, blood pressure tracks age and weight
            let weight = 0.9 * (height - 100.0) + rng.gauss(0.0, 8.0);
            let systolic = 95.0 + 0.45 * age + 0.2 * weight + rng.gauss(0.0, 9.0);
            let day = 1 + (i % 28);
            let month = 1 + (i / 28) % 12;

            Row {
                id: i as i64,
                age: rng.maybe(0.03, age),
                height_cm: (height * 10.0).round() / 10.0,
                weight_kg: rng.maybe(0.08, (weight * 10.0).round() / 10.0),
                systolic: rng.maybe(0.05, systolic.round()),
                group: rng.maybe(0.02, groups[i % groups.len()]),
                smoker: rng.next_f64() < 0.22,
                visit_date: format!("2024-{month:02}-{day:02}"),
            }
        })
        .collect()
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "id", "age", "height_cm", "weight_kg", "systolic_bp", "group", "smoker", "visit_date",
    ])?;
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            opt(r.age),
            r.height_cm.to_string(),
            opt(r.weight_kg),
            opt(r.systolic),
            r.group.unwrap_or("").to_string(),
            if r.smoker { "True" } else { "False" }.to_string(),
            r.visit_date.clone(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("age", DataType::Float64, true),
        Field::new("height_cm", DataType::Float64, false),
        Field::new("weight_kg", DataType::Float64, true),
        Field::new("systolic_bp", DataType::Float64, true),
        Field::new("group", DataType::Utf8, true),
        Field::new("smoker", DataType::Boolean, false),
        Field::new("visit_date", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.height_cm))),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.weight_kg).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.systolic).collect::<Vec<_>>())),
        Arc::new(StringArray::from(rows.iter().map(|r| r.group).collect::<Vec<_>>())),
        Arc::new(BooleanArray::from(rows.iter().map(|r| r.smoker).collect::<Vec<_>>())),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.visit_date.as_str()))),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_data.csv")?;
    write_parquet(&rows, "sample_data.parquet")?;

    println!(
        "Wrote {} rows to sample_data.csv and sample_data.parquet",
        rows.len()
    );
    Ok(())
}
