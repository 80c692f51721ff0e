//! Writes a deterministic sample sales dataset for demoing the dashboard:
//! `sales_data.xlsx` with the original Arabic headers (exercising the header
//! alias mapping) and `sales_data.csv` with the canonical English ones.

use chrono::{Days, NaiveDate};
use rust_xlsxwriter::Workbook;

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

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Row {
    country: String,
    product: String,
    total_sales: f64,
    order_date: NaiveDate,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let countries = ["Egypt", "UAE", "Saudi Arabia", "Kuwait", "Qatar"];
    let products = ["Smartphone", "Laptop", "Headphones", "Smart Watch", "Tablet"];
    let year_start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    let rows: Vec<Row> = (0..500)
        .map(|_| {
            let amount = 50.0 + rng.next_f64() * 4950.0;
            let day_offset = rng.next_u64() % 366;
            Row {
                country: rng.pick(&countries).to_string(),
                product: rng.pick(&products).to_string(),
                total_sales: (amount * 100.0).round() / 100.0,
                order_date: year_start + Days::new(day_offset),
            }
        })
        .collect();

    write_xlsx(&rows).expect("Failed to write sales_data.xlsx");
    write_csv(&rows).expect("Failed to write sales_data.csv");

    println!("Wrote {} records to sales_data.xlsx and sales_data.csv", rows.len());
}

/// Arabic headers, matching the original source spreadsheet.
fn write_xlsx(rows: &[Row]) -> Result<(), rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = ["الدولة", "المنتج", "إجمالي المبيعات", "تاريخ الطلب"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &row.country)?;
        worksheet.write_string(r, 1, &row.product)?;
        worksheet.write_number(r, 2, row.total_sales)?;
        worksheet.write_string(r, 3, row.order_date.format("%Y-%m-%d").to_string())?;
    }

    workbook.save("sales_data.xlsx")
}

fn write_csv(rows: &[Row]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path("sales_data.csv")?;
    writer.write_record(["Country", "Product", "Total Sales", "Order Date"])?;
    for row in rows {
        writer.write_record([
            row.country.as_str(),
            row.product.as_str(),
            &row.total_sales.to_string(),
            &row.order_date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
