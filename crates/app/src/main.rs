use std::{error::Error, path::PathBuf, str::FromStr};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use engine::{
    ContactKind, CreditKind, Engine, Money, NewContact, NewCredit, NewCreditPayment, NewExpense,
    NewProduct, NewReturn, NewSale, PaymentMethod, SaleItem,
};
use migration::MigratorTrait;
use uuid::Uuid;

mod settings;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "bahi")]
#[command(about = "Bookkeeping ledger for a small shop (sales, udhaar, stock)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`, falling
    /// back to `bahi.toml` and then `sqlite:./bahi.db?mode=rwc`).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Sale(Sale),
    Expense(Expense),
    Credit(Credit),
    Product(Product),
    Contact(Contact),
    Return(Return),
    /// Print today's figures and the account balances.
    Summary,
    Backup(Backup),
}

#[derive(Args, Debug)]
struct Sale {
    #[command(subcommand)]
    command: SaleCommand,
}

#[derive(Subcommand, Debug)]
enum SaleCommand {
    Add(SaleAddArgs),
    List,
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
struct SaleAddArgs {
    /// Grand total after discount/tax, in rupees (e.g. `450.50`).
    #[arg(long, value_parser = parse_money)]
    total: Money,
    /// Amount received now; defaults to the total. Anything less records an
    /// udhaar credit against the customer.
    #[arg(long, value_parser = parse_money)]
    paid: Option<Money>,
    #[arg(long, default_value = "")]
    customer: String,
    #[arg(long, default_value = "Cash", value_parser = parse_method)]
    method: PaymentMethod,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    #[arg(long)]
    note: Option<String>,
    /// Line item as `<product-id>:<qty>`; repeatable. Prices come from the
    /// product record.
    #[arg(long = "item")]
    items: Vec<String>,
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List,
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[arg(long)]
    title: String,
    #[arg(long, value_parser = parse_money)]
    amount: Money,
    #[arg(long, default_value = "Cash", value_parser = parse_method)]
    method: PaymentMethod,
    #[arg(long)]
    vendor: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct Credit {
    #[command(subcommand)]
    command: CreditCommand,
}

#[derive(Subcommand, Debug)]
enum CreditCommand {
    Add(CreditAddArgs),
    /// Record a repayment against a credit.
    Pay(CreditPayArgs),
    List,
}

#[derive(Args, Debug)]
struct CreditAddArgs {
    #[arg(long)]
    party: String,
    /// `given` (customer owes us) or `taken` (we owe a supplier).
    #[arg(long, default_value = "given", value_parser = parse_kind)]
    kind: CreditKind,
    #[arg(long, value_parser = parse_money)]
    amount: Money,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct CreditPayArgs {
    id: Uuid,
    #[arg(long, value_parser = parse_money)]
    amount: Money,
    #[arg(long, default_value = "Cash", value_parser = parse_method)]
    method: PaymentMethod,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Add(ProductAddArgs),
    List,
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
struct ProductAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 0)]
    stock: i64,
    #[arg(long, value_parser = parse_money)]
    price: Money,
    #[arg(long, value_parser = parse_money)]
    cost: Option<Money>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_stock: Option<i64>,
}

#[derive(Args, Debug)]
struct Contact {
    #[command(subcommand)]
    command: ContactCommand,
}

#[derive(Subcommand, Debug)]
enum ContactCommand {
    Add(ContactAddArgs),
    List,
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
struct ContactAddArgs {
    #[arg(long)]
    name: String,
    /// `customer`, `vendor` or `both`.
    #[arg(long, default_value = "customer", value_parser = parse_contact_kind)]
    kind: ContactKind,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug)]
struct Return {
    #[command(subcommand)]
    command: ReturnCommand,
}

#[derive(Subcommand, Debug)]
enum ReturnCommand {
    /// Record a return for a sale (restocks items, closes linked udhaar).
    Add {
        sale_id: Uuid,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
struct Backup {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Subcommand, Debug)]
enum BackupCommand {
    /// Write the full backup JSON document.
    Export { path: PathBuf },
    /// Replace every collection with the contents of a backup file.
    Import { path: PathBuf },
    /// Export the sales register as CSV.
    Csv { path: PathBuf },
}

fn parse_money(raw: &str) -> Result<Money, String> {
    Money::from_str(raw).map_err(|err| err.to_string())
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::try_from(raw).map_err(|err| err.to_string())
}

fn parse_kind(raw: &str) -> Result<CreditKind, String> {
    CreditKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_contact_kind(raw: &str) -> Result<ContactKind, String> {
    ContactKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| err.to_string())
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Resolve `<product-id>:<qty>` against the product register.
fn parse_item(engine: &Engine, raw: &str) -> AppResult<SaleItem> {
    let (id, qty) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid item '{raw}', expected <product-id>:<qty>"))?;
    let product_id = Uuid::parse_str(id.trim())?;
    let quantity: i64 = qty.trim().parse()?;
    let product = engine
        .snapshot()
        .product(product_id)
        .ok_or_else(|| format!("unknown product {product_id}"))?;

    let mut item = SaleItem::new(product_id, quantity, product.unit_price);
    item.cost_price = product.cost_price;
    Ok(item)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bahi={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let url = cli
        .database_url
        .or(settings.app.database)
        .unwrap_or_else(|| "sqlite:./bahi.db?mode=rwc".to_string());
    let db = sea_orm::Database::connect(&url).await?;
    migration::Migrator::up(&db, None).await?;

    let mut engine = Engine::builder().database(db).build().await?;
    tracing::debug!(%url, sales = engine.sales().len(), "ledger loaded");
    run(&mut engine, cli.command).await
}

async fn run(engine: &mut Engine, command: Command) -> AppResult<()> {
    match command {
        Command::Sale(sale) => match sale.command {
            SaleCommand::Add(args) => {
                let items = args
                    .items
                    .iter()
                    .map(|raw| parse_item(engine, raw))
                    .collect::<AppResult<Vec<_>>>()?;
                let mut draft = NewSale::new(args.total, args.method, today_or(args.date))
                    .customer(args.customer)
                    .items(items);
                if let Some(paid) = args.paid {
                    draft = draft.paid(paid);
                }
                if let Some(note) = args.note {
                    draft = draft.note(note);
                }
                let id = engine.add_sale(draft).await?;
                println!("recorded sale {id}");
            }
            SaleCommand::List => {
                for sale in engine.sales() {
                    println!(
                        "{}  {}  {:<20}  {}  paid {}  {}",
                        sale.id,
                        sale.date,
                        sale.customer_name,
                        sale.total_amount,
                        sale.effective_paid(),
                        sale.payment_method.as_str(),
                    );
                }
            }
            SaleCommand::Delete { id } => {
                engine.delete_sale(id).await?;
                println!("deleted sale {id}");
            }
        },
        Command::Expense(expense) => match expense.command {
            ExpenseCommand::Add(args) => {
                let mut draft = NewExpense::new(args.title, args.amount, today_or(args.date))
                    .payment_method(args.method);
                if let Some(vendor) = args.vendor {
                    draft = draft.vendor(vendor);
                }
                if let Some(category) = args.category {
                    draft = draft.category(category);
                }
                let id = engine.add_expense(draft).await?;
                println!("recorded expense {id}");
            }
            ExpenseCommand::List => {
                for expense in engine.expenses() {
                    println!(
                        "{}  {}  {:<20}  {}  {}",
                        expense.id,
                        expense.date,
                        expense.title,
                        expense.amount,
                        expense.payment_method.as_str(),
                    );
                }
            }
            ExpenseCommand::Delete { id } => {
                engine.delete_expense(id).await?;
                println!("deleted expense {id}");
            }
        },
        Command::Credit(credit) => match credit.command {
            CreditCommand::Add(args) => {
                let id = engine
                    .add_credit(NewCredit::new(
                        args.party,
                        args.kind,
                        args.amount,
                        today_or(args.date),
                    ))
                    .await?;
                println!("recorded credit {id}");
            }
            CreditCommand::Pay(args) => {
                engine
                    .add_credit_payment(
                        args.id,
                        NewCreditPayment::new(args.amount, args.method, today_or(args.date)),
                    )
                    .await?;
                let credit = engine.snapshot().credit(args.id).ok_or("credit vanished")?;
                println!(
                    "credit {} now {:?}, paid {} of {}",
                    args.id, credit.status, credit.paid_amount, credit.amount
                );
            }
            CreditCommand::List => {
                for credit in engine.credits() {
                    println!(
                        "{}  {}  {:<20}  {:?}  {} paid of {}  {:?}",
                        credit.id,
                        credit.date,
                        credit.party,
                        credit.kind,
                        credit.paid_amount,
                        credit.amount,
                        credit.status,
                    );
                }
            }
        },
        Command::Product(product) => match product.command {
            ProductCommand::Add(args) => {
                let mut draft = NewProduct::new(args.name, args.stock, args.price);
                if let Some(cost) = args.cost {
                    draft = draft.cost_price(cost);
                }
                if let Some(category) = args.category {
                    draft = draft.category(category);
                }
                if let Some(level) = args.min_stock {
                    draft = draft.min_stock_level(level);
                }
                let id = engine.add_product(draft).await?;
                println!("added product {id}");
            }
            ProductCommand::List => {
                for product in engine.products() {
                    let low = if product.is_low_stock() { "  LOW" } else { "" };
                    println!(
                        "{}  {:<24}  stock {:>5}  {}{low}",
                        product.id, product.name, product.stock, product.unit_price,
                    );
                }
            }
            ProductCommand::Delete { id } => {
                engine.delete_product(id).await?;
                println!("deleted product {id}");
            }
        },
        Command::Contact(contact) => match contact.command {
            ContactCommand::Add(args) => {
                let mut draft = NewContact::new(args.name, args.kind);
                if let Some(phone) = args.phone {
                    draft = draft.phone(phone);
                }
                let id = engine.add_contact(draft).await?;
                println!("added contact {id}");
            }
            ContactCommand::List => {
                for contact in engine.contacts() {
                    println!(
                        "{}  {:<24}  {}  {}",
                        contact.id,
                        contact.name,
                        contact.kind.as_str(),
                        contact.phone.as_deref().unwrap_or("-"),
                    );
                }
            }
            ContactCommand::Delete { id } => {
                engine.delete_contact(id).await?;
                println!("deleted contact {id}");
            }
        },
        Command::Return(ret) => match ret.command {
            ReturnCommand::Add {
                sale_id,
                date,
                note,
            } => {
                let mut draft = NewReturn::new(sale_id, today_or(date));
                if let Some(note) = note {
                    draft = draft.note(note);
                }
                let id = engine.add_return(draft).await?;
                println!("recorded return {id}");
            }
            ReturnCommand::Delete { id } => {
                engine.delete_return(id).await?;
                println!("deleted return {id}");
            }
        },
        Command::Summary => {
            println!("today's sales     {}", engine.today_sales());
            println!("cash received     {}", engine.today_cash_received());
            println!("UPI received      {}", engine.today_upi_received());
            println!("today's expenses  {}", engine.today_expenses());
            println!("udhaar collected  {}", engine.credit_payments_received());
            println!("udhaar repaid     {}", engine.credit_payments_made());
            println!("balance           {}", engine.balance());
            println!("  cash            {}", engine.cash_balance());
            println!("  UPI             {}", engine.upi_balance());
        }
        Command::Backup(backup) => match backup.command {
            BackupCommand::Export { path } => {
                let backup = engine.export_all_data();
                std::fs::write(&path, serde_json::to_vec_pretty(&backup)?)?;
                println!("exported backup to {}", path.display());
            }
            BackupCommand::Import { path } => {
                let backup: engine::Backup =
                    serde_json::from_slice(&std::fs::read(&path)?)?;
                engine.restore_data(backup).await?;
                println!("restored backup from {}", path.display());
            }
            BackupCommand::Csv { path } => {
                let mut writer = csv::Writer::from_path(&path)?;
                writer.write_record([
                    "id", "date", "customer", "total", "paid", "method", "invoice",
                ])?;
                for sale in engine.sales() {
                    let invoice = sale
                        .billing
                        .as_ref()
                        .and_then(|billing| billing.invoice_number.clone())
                        .unwrap_or_default();
                    writer.write_record([
                        sale.id.to_string(),
                        sale.date.to_string(),
                        sale.customer_name.clone(),
                        sale.total_amount.to_string(),
                        sale.effective_paid().to_string(),
                        sale.payment_method.as_str().to_string(),
                        invoice,
                    ])?;
                }
                writer.flush()?;
                println!("exported {} sales to {}", engine.sales().len(), path.display());
            }
        },
    }

    Ok(())
}
