//! Demo data generator
//!
//! Three business clients with different cash profiles and 180 days of
//! operating-account activity:
//! - a cash-rich technology company (idle balances, wire receipts)
//! - a check-heavy manufacturer with a volatile balance
//! - a small clinic running close to its low-balance threshold
//!
//! Generation is deterministic for a given end date: a seeded `StdRng`
//! drives amounts and identifiers are derived from a counter.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Client, ClientAccount, Transaction, TransactionType};

/// Days of history generated per client
pub const DEMO_DAYS: i64 = 180;

const SEED: u64 = 42;

/// A recurring or random outflow to a vendor
struct VendorSpend {
    name: &'static str,
    category: &'static str,
    method: TransactionType,
    /// Whole-dollar range
    range: (i64, i64),
    /// Chance of a payment on any given business day
    probability: f64,
}

struct Profile {
    client_id: u128,
    name: &'static str,
    industry: &'static str,
    segment: &'static str,
    manager: &'static str,
    bank: &'static str,
    opening_balance: i64,
    /// Customer receipts per business day
    receipts: (i64, i64),
    receipt_method: TransactionType,
    /// Paid every other Friday
    payroll: i64,
    rent: i64,
    vendors: &'static [VendorSpend],
}

const PROFILES: [Profile; 3] = [
    Profile {
        client_id: 0x7e5c_0001_0000_4000_8000_0000_0000_0001,
        name: "Northwind Technologies",
        industry: "technology",
        segment: "enterprise",
        manager: "Dana Whitfield",
        bank: "First Harbor Bank",
        opening_balance: 2_400_000,
        receipts: (20_000, 60_000),
        receipt_method: TransactionType::Wire,
        payroll: 310_000,
        rent: 85_000,
        vendors: &[
            VendorSpend {
                name: "Amazon Web Services",
                category: "Cloud Infrastructure",
                method: TransactionType::Ach,
                range: (4_000, 9_000),
                probability: 0.2,
            },
            VendorSpend {
                name: "Google Cloud",
                category: "Cloud Infrastructure",
                method: TransactionType::Ach,
                range: (1_500, 4_000),
                probability: 0.1,
            },
            VendorSpend {
                name: "Figma",
                category: "Software",
                method: TransactionType::Debit,
                range: (300, 900),
                probability: 0.05,
            },
            VendorSpend {
                name: "Delta Air Lines",
                category: "Travel",
                method: TransactionType::Debit,
                range: (400, 2_500),
                probability: 0.15,
            },
        ],
    },
    Profile {
        client_id: 0x7e5c_0002_0000_4000_8000_0000_0000_0002,
        name: "Harbor Manufacturing Co",
        industry: "manufacturing",
        segment: "middle_market",
        manager: "Luis Ortega",
        bank: "First Harbor Bank",
        opening_balance: 420_000,
        receipts: (8_000, 30_000),
        receipt_method: TransactionType::Ach,
        payroll: 120_000,
        rent: 30_000,
        vendors: &[
            VendorSpend {
                name: "Great Lakes Steel",
                category: "Raw Materials",
                method: TransactionType::Check,
                range: (8_000, 40_000),
                probability: 0.25,
            },
            VendorSpend {
                name: "Midwest Polymers",
                category: "Raw Materials",
                method: TransactionType::Check,
                range: (3_000, 12_000),
                probability: 0.2,
            },
            VendorSpend {
                name: "Consolidated Freight",
                category: "Logistics",
                method: TransactionType::Check,
                range: (1_000, 6_000),
                probability: 0.3,
            },
            VendorSpend {
                name: "City Power & Light",
                category: "Utilities",
                method: TransactionType::Ach,
                range: (2_000, 5_000),
                probability: 0.05,
            },
        ],
    },
    Profile {
        client_id: 0x7e5c_0003_0000_4000_8000_0000_0000_0003,
        name: "Maple Street Clinic",
        industry: "healthcare",
        segment: "small_business",
        manager: "Dana Whitfield",
        bank: "Community Trust",
        opening_balance: 45_000,
        receipts: (1_000, 4_500),
        receipt_method: TransactionType::Ach,
        payroll: 18_000,
        rent: 6_500,
        vendors: &[
            VendorSpend {
                name: "McKesson Medical",
                category: "Medical Supplies",
                method: TransactionType::Ach,
                range: (500, 3_000),
                probability: 0.25,
            },
            VendorSpend {
                name: "Cardinal Health",
                category: "Medical Supplies",
                method: TransactionType::Check,
                range: (300, 1_500),
                probability: 0.1,
            },
            VendorSpend {
                name: "Staples",
                category: "Office Supplies",
                method: TransactionType::Debit,
                range: (50, 400),
                probability: 0.1,
            },
        ],
    },
];

/// Everything written to a demo database
#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub clients: Vec<Client>,
    pub accounts: Vec<ClientAccount>,
    pub transactions: Vec<Transaction>,
}

/// Generate the demo dataset ending on `end` (inclusive)
pub fn generate_demo_data(end: NaiveDate) -> DemoDataset {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut dataset = DemoDataset {
        clients: Vec::new(),
        accounts: Vec::new(),
        transactions: Vec::new(),
    };

    for profile in &PROFILES {
        let client = Client {
            relationship_manager: Some(profile.manager.to_string()),
            ..Client::new(Uuid::from_u128(profile.client_id), profile.name)
                .with_profile(profile.industry, profile.segment)
        };

        let mut operating = ClientAccount::new(
            Uuid::from_u128(profile.client_id ^ 0xa),
            client.id,
            "Operating",
        );
        operating.account_type = Some("operating".to_string());
        operating.bank_name = Some(profile.bank.to_string());

        let mut builder = HistoryBuilder {
            client_id: client.id,
            account_id: operating.id,
            id_base: profile.client_id << 16,
            sequence: 0,
            balance: Decimal::from(profile.opening_balance),
            transactions: Vec::new(),
        };
        builder.generate(profile, end, &mut rng);

        dataset.transactions.extend(builder.transactions);
        dataset.accounts.push(operating);
        dataset.clients.push(client);
    }

    dataset
}

struct HistoryBuilder {
    client_id: Uuid,
    account_id: Uuid,
    id_base: u128,
    sequence: u128,
    balance: Decimal,
    transactions: Vec<Transaction>,
}

impl HistoryBuilder {
    fn generate(&mut self, profile: &Profile, end: NaiveDate, rng: &mut StdRng) {
        let start = end - Duration::days(DEMO_DAYS - 1);

        for offset in 0..DEMO_DAYS {
            let date = start + Duration::days(offset);
            let business_day = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

            if date.day() == 1 {
                self.post(date, -profile.rent * 100, TransactionType::Ach, "Rent", Some("Landlord"));
            }
            // every other Friday
            if date.weekday() == Weekday::Fri && (offset / 7) % 2 == 0 {
                self.post(date, -profile.payroll * 100, TransactionType::Ach, "Payroll", Some("ADP Payroll"));
            }
            if date.day() == 28 {
                self.post(date, -2_500, TransactionType::Fee, "Bank Fees", None);
                let interest = (self.balance * Decimal::new(1, 4)).round_dp(2).max(Decimal::ZERO);
                if interest > Decimal::ZERO {
                    self.post_exact(date, interest, TransactionType::Interest, "Interest", None);
                }
            }
            if !business_day {
                continue;
            }

            let receipt = rng.gen_range(profile.receipts.0 * 100..=profile.receipts.1 * 100);
            self.post(date, receipt, profile.receipt_method, "Customer Receipts", None);

            for vendor in profile.vendors {
                if rng.gen_bool(vendor.probability) {
                    let cents = rng.gen_range(vendor.range.0 * 100..=vendor.range.1 * 100);
                    self.post(date, -cents, vendor.method, vendor.category, Some(vendor.name));
                }
            }
        }
    }

    fn post(
        &mut self,
        date: NaiveDate,
        cents: i64,
        transaction_type: TransactionType,
        category: &str,
        counterparty: Option<&str>,
    ) {
        self.post_exact(date, Decimal::new(cents, 2), transaction_type, category, counterparty);
    }

    fn post_exact(
        &mut self,
        date: NaiveDate,
        amount: Decimal,
        transaction_type: TransactionType,
        category: &str,
        counterparty: Option<&str>,
    ) {
        self.sequence += 1;
        self.balance += amount;

        let mut tx = Transaction::new(
            Uuid::from_u128(self.id_base | self.sequence),
            self.client_id,
            self.account_id,
            amount,
            date,
            transaction_type,
        );
        tx.category = Some(category.to_string());
        tx.counterparty = counterparty.map(str::to_string);
        tx.description = Some(match counterparty {
            Some(name) => format!("{} - {}", category, name),
            None => category.to_string(),
        });
        tx.balance_after = Some(self.balance);
        self.transactions.push(tx);
    }
}
