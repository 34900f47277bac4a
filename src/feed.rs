use rand::Rng;

use crate::error::Result;
use crate::types::StockRecord;

/// External collaborator contract for anything that supplies a record list
/// on demand. A real implementation may fail with `Network` or `Parse`; the
/// bundled mock feed cannot, but honors the same signature.
pub trait RecordSource {
    fn fetch(&mut self) -> Result<Vec<StockRecord>>;
}

// symbol, name, sector, change %, market cap (billions), price, volume
const UNIVERSE: &[(&str, &str, &str, f64, f64, f64, Option<u64>)] = &[
    ("RELIANCE.NS", "Reliance Industries", "Energy", 2.41, 3920.0, 2913.0, Some(5830)),
    ("TCS.NS", "Tata Consultancy Services", "IT", -0.87, 2780.0, 3618.0, Some(2140)),
    ("HDFCBANK.NS", "HDFC Bank", "Financial Services", 0.24, 2410.0, 1672.0, Some(8460)),
    ("INFY.NS", "Infosys", "IT", -1.41, 1890.0, 1452.0, Some(4920)),
    ("HINDUNILVR.NS", "Hindustan Unilever", "Consumer Goods", 1.02, 1340.0, 2563.0, Some(1080)),
    ("ICICIBANK.NS", "ICICI Bank", "Financial Services", 0.62, 1260.0, 1078.0, Some(9870)),
    ("BHARTIARTL.NS", "Bharti Airtel", "Telecom", -0.33, 1120.0, 958.0, Some(3310)),
    ("SBIN.NS", "State Bank of India", "Financial Services", 1.54, 1020.0, 682.0, Some(12400)),
    ("KOTAKBANK.NS", "Kotak Mahindra Bank", "Financial Services", -0.42, 920.0, 1744.0, Some(2780)),
    ("BAJFINANCE.NS", "Bajaj Finance", "Financial Services", -2.13, 860.0, 6724.0, Some(1460)),
    ("ASIANPAINT.NS", "Asian Paints", "Consumer Goods", 0.87, 850.0, 3122.0, Some(940)),
    ("LT.NS", "Larsen & Toubro", "Construction", 1.76, 830.0, 2956.0, Some(1870)),
    ("AXISBANK.NS", "Axis Bank", "Financial Services", 0.91, 810.0, 1042.0, Some(7620)),
    ("ITC.NS", "ITC", "Consumer Goods", -0.18, 790.0, 428.0, Some(15300)),
    ("MARUTI.NS", "Maruti Suzuki", "Automobile", 2.08, 760.0, 11240.0, Some(620)),
    ("SUNPHARMA.NS", "Sun Pharmaceutical", "Pharma", 0.44, 740.0, 1534.0, Some(1980)),
    ("TITAN.NS", "Titan Company", "Consumer Goods", -1.07, 710.0, 3287.0, Some(810)),
    ("ULTRACEMCO.NS", "UltraTech Cement", "Cement", 1.22, 680.0, 9860.0, Some(340)),
    ("NTPC.NS", "NTPC", "Energy", 0.73, 640.0, 361.0, Some(11200)),
    ("ONGC.NS", "Oil & Natural Gas Corp", "Energy", -0.56, 620.0, 268.0, Some(9340)),
    ("WIPRO.NS", "Wipro", "IT", -1.84, 590.0, 478.0, Some(5110)),
    ("HCLTECH.NS", "HCL Technologies", "IT", -0.62, 580.0, 1327.0, Some(2650)),
    ("POWERGRID.NS", "Power Grid Corp", "Energy", 0.31, 560.0, 312.0, Some(8720)),
    ("TATAMOTORS.NS", "Tata Motors", "Automobile", 3.12, 550.0, 1024.0, Some(13600)),
    ("M&M.NS", "Mahindra & Mahindra", "Automobile", 1.67, 540.0, 2731.0, Some(1540)),
    ("BAJAJFINSV.NS", "Bajaj Finserv", "Financial Services", -1.28, 520.0, 1618.0, Some(1120)),
    ("ADANIENT.NS", "Adani Enterprises", "Conglomerate", -3.41, 510.0, 2874.0, Some(2430)),
    ("ADANIPORTS.NS", "Adani Ports", "Infrastructure", -2.76, 490.0, 1286.0, Some(3180)),
    ("COALINDIA.NS", "Coal India", "Energy", 0.58, 470.0, 412.0, Some(7850)),
    ("NESTLEIND.NS", "Nestle India", "Consumer Goods", 0.12, 460.0, 2418.0, Some(290)),
    ("JSWSTEEL.NS", "JSW Steel", "Metals", 1.94, 440.0, 927.0, Some(2960)),
    ("TATASTEEL.NS", "Tata Steel", "Metals", 2.36, 430.0, 154.0, Some(28700)),
    ("GRASIM.NS", "Grasim Industries", "Cement", 0.82, 410.0, 2489.0, Some(730)),
    ("HINDALCO.NS", "Hindalco Industries", "Metals", 1.48, 390.0, 618.0, Some(4280)),
    ("TECHM.NS", "Tech Mahindra", "IT", -0.94, 370.0, 1489.0, Some(1890)),
    ("INDUSINDBK.NS", "IndusInd Bank", "Financial Services", -1.62, 350.0, 1372.0, Some(2540)),
    ("DRREDDY.NS", "Dr Reddy's Laboratories", "Pharma", 0.37, 340.0, 6218.0, Some(410)),
    ("CIPLA.NS", "Cipla", "Pharma", 0.96, 330.0, 1463.0, Some(1320)),
    ("BAJAJ-AUTO.NS", "Bajaj Auto", "Automobile", 1.13, 320.0, 8946.0, Some(380)),
    ("EICHERMOT.NS", "Eicher Motors", "Automobile", 0.54, 310.0, 4512.0, Some(460)),
    ("APOLLOHOSP.NS", "Apollo Hospitals", "Healthcare", -0.71, 300.0, 6384.0, Some(350)),
    ("DIVISLAB.NS", "Divi's Laboratories", "Pharma", 1.26, 290.0, 5871.0, Some(280)),
    ("BRITANNIA.NS", "Britannia Industries", "Consumer Goods", 0.29, 280.0, 5144.0, Some(240)),
    ("HEROMOTOCO.NS", "Hero MotoCorp", "Automobile", -0.48, 270.0, 4423.0, Some(510)),
    ("SHRIRAMFIN.NS", "Shriram Finance", "Financial Services", 2.18, 260.0, 2912.0, Some(890)),
    ("BPCL.NS", "Bharat Petroleum", "Energy", 0.68, 250.0, 582.0, Some(3740)),
    ("TATACONSUM.NS", "Tata Consumer Products", "Consumer Goods", -0.26, 240.0, 1087.0, Some(1150)),
    ("SBILIFE.NS", "SBI Life Insurance", "Financial Services", 0.41, 230.0, 1468.0, None),
    ("HDFCLIFE.NS", "HDFC Life Insurance", "Financial Services", -0.83, 220.0, 641.0, None),
    ("LTIM.NS", "LTIMindtree", "IT", -2.24, 210.0, 5236.0, None),
];

/// In-process stand-in for a market data feed. Serves the static Nifty 50
/// universe; every fetch re-validates at the ingestion boundary.
pub struct MockFeed;

impl MockFeed {
    pub fn new() -> Self {
        MockFeed
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for MockFeed {
    fn fetch(&mut self) -> Result<Vec<StockRecord>> {
        let mut records = Vec::with_capacity(UNIVERSE.len());
        for (symbol, name, sector, change, cap, price, volume) in UNIVERSE {
            let record = StockRecord {
                symbol: symbol.to_string(),
                name: name.to_string(),
                sector: sector.to_string(),
                change_percent: *change,
                market_cap: *cap,
                price: *price,
                volume: *volume,
            };
            record.validate()?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Simulated update: a new list where each change percentage shifts by a
/// uniform random delta in [-1, +1), rounded to two decimals. Every other
/// field is untouched. The caller swaps the whole list for the result.
pub fn refresh(records: &[StockRecord]) -> Vec<StockRecord> {
    let mut rng = rand::thread_rng();
    records
        .iter()
        .map(|record| StockRecord {
            change_percent: round2(record.change_percent + rng.gen_range(-1.0..1.0)),
            ..record.clone()
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
