//! Interactive session shell: login and the role-gated dashboards.
//!
//! Everything here is a thin prompt/render loop around the engine. Engine
//! failures are printed and the menu reprompts; nothing in a dashboard can
//! take the process down.

use std::io::{self, Write};

use chrono::Local;
use engine::{Catalog, EngineError, Ledger, MoneyCents, MonthKey, dates, reports};

use crate::{
    auth::{self, Credentials, Role},
    charts,
    error::Result,
    views,
};

const RETRY_LIMIT: u32 = 3;

/// Asks for a line of input, trimming whitespace. A closed stdin is an
/// error so an unattended run cannot spin on an empty prompt.
fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input stream closed",
        ));
    }
    Ok(line.trim().to_string())
}

/// Three-attempt login. `None` means the session should end without a
/// dashboard: attempts exhausted, empty table, or an unknown access level.
pub fn login(credentials: &Credentials) -> Result<Option<(String, Role)>> {
    println!("\n=== User Authentication ===");
    if credentials.is_empty() {
        println!("Authentication database is empty. Terminating.");
        return Ok(None);
    }

    for _ in 0..RETRY_LIMIT {
        let username = prompt("Username: ")?;
        let password = prompt("Password: ")?;

        if let Some(credential) = auth::verify(credentials, &username, &password) {
            let Some(role) = Role::parse(&credential.role) else {
                tracing::error!(%username, level = %credential.role, "unknown access level");
                println!("Unknown access level. Exiting.");
                return Ok(None);
            };
            println!("\nAuthentication successful! Greetings, {username} [{role:?}].");
            return Ok(Some((username, role)));
        }
        println!("Authentication failed. Please try again.");
    }

    println!("Login attempt limit exceeded. Exiting system.");
    Ok(None)
}

/// Runs the dashboard for a role until the user signs out.
pub fn run_dashboard(role: Role, catalog: &mut Catalog, ledger: &mut Ledger) -> Result<()> {
    match role {
        Role::Assistant => staff_dashboard(catalog, ledger),
        Role::Manager => supervisor_dashboard(catalog, ledger),
    }
}

fn staff_dashboard(catalog: &mut Catalog, ledger: &mut Ledger) -> Result<()> {
    loop {
        println!("\n╔═════════════════════════════════════╗");
        println!("║          STAFF DASHBOARD            ║");
        println!("╠═════════════════════════════════════╣");
        println!("║ 1. Process Transaction              ║");
        println!("║ 2. View Product Catalog             ║");
        println!("║ 3. Search Sales by Date             ║");
        println!("║ 4. Search Sales by Product Name     ║");
        println!("║ 5. Search Sales by Product & Date   ║");
        println!("║ 6. Sign Out & Save                  ║");
        println!("╚═════════════════════════════════════╝");

        match prompt("Select option: ")?.as_str() {
            "1" => process_transaction(catalog, ledger)?,
            "2" => views::render_catalog(catalog),
            "3" => search_by_date(ledger)?,
            "4" => search_by_product_name(ledger, catalog)?,
            "5" => search_by_product_and_range(ledger, catalog)?,
            "6" => return Ok(()),
            _ => println!("Invalid selection."),
        }
    }
}

fn supervisor_dashboard(catalog: &mut Catalog, ledger: &mut Ledger) -> Result<()> {
    loop {
        println!("\n╔═════════════════════════════════════╗");
        println!("║        SUPERVISOR DASHBOARD         ║");
        println!("╠═════════════════════════════════════╣");
        println!("║ 1. Process Transaction              ║");
        println!("║ 2. Register New Product             ║");
        println!("║ 3. Modify Product Details           ║");
        println!("║ 4. View Product Catalog             ║");
        println!("║ 5. Search Sales by Date             ║");
        println!("║ 6. Search Sales by Product Name     ║");
        println!("║ 7. Search Sales by Product & Date   ║");
        println!("║ 8. Display Overall Monthly Sales    ║");
        println!("║ 9. Display Product Monthly Sales    ║");
        println!("║ 10. Display Product Total Sales     ║");
        println!("║ 11. Sign Out & Save                 ║");
        println!("╚═════════════════════════════════════╝");

        match prompt("Select option: ")?.as_str() {
            "1" => process_transaction(catalog, ledger)?,
            "2" => register_product(catalog)?,
            "3" => modify_product(catalog)?,
            "4" => views::render_catalog(catalog),
            "5" => search_by_date(ledger)?,
            "6" => search_by_product_name(ledger, catalog)?,
            "7" => search_by_product_and_range(ledger, catalog)?,
            "8" => overall_monthly_sales(ledger)?,
            "9" => product_monthly_sales(ledger, catalog)?,
            "10" => product_total_sales(ledger, catalog)?,
            "11" => return Ok(()),
            _ => println!("Invalid selection."),
        }
    }
}

fn process_transaction(catalog: &mut Catalog, ledger: &mut Ledger) -> Result<()> {
    if catalog.is_empty() {
        println!("Database is empty.");
        return Ok(());
    }

    views::render_catalog(catalog);
    let product_id = prompt("\nEnter Product ID to purchase: ")?;
    let Some(product) = catalog.find_by_id(&product_id) else {
        println!("Item ID '{product_id}' not found in inventory.");
        return Ok(());
    };
    let name = product.name.clone();
    let unit_price = product.price;

    let quantity_text = prompt(&format!("Enter quantity to purchase for '{name}': "))?;
    let Ok(quantity) = quantity_text.parse::<i64>() else {
        println!("Invalid input. Quantity must be an integer. Transaction terminated.");
        return Ok(());
    };

    match engine::sell(catalog, ledger, &product_id, quantity, Local::now().naive_local()) {
        Ok(transaction) => {
            println!("\n##### Summary #####");
            println!("Item: {name}");
            println!("Quantity: {}", transaction.quantity);
            println!("Unit Price: ${unit_price}");
            println!("Transaction Total (Amount Collected): ${}", transaction.payment);

            let remaining = catalog
                .find_by_id(&product_id)
                .map(|product| product.stock)
                .unwrap_or(0);
            println!(
                "Transaction recorded successfully! Updated inventory for {name}: {remaining} units remaining."
            );
        }
        Err(err @ EngineError::InvalidQuantity(_)) => {
            println!("{err} Transaction terminated.");
        }
        Err(EngineError::InsufficientStock(details)) => {
            println!("Stock insufficient ({details}). Transaction terminated.");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn register_product(catalog: &mut Catalog) -> Result<()> {
    println!("System-Generated Product ID: {}", catalog.next_id());

    let name = prompt("Product Name: ")?;
    if name.is_empty() {
        println!("Product name is required.");
        return Ok(());
    }

    let price_text = prompt("Price per Unit: ")?;
    let Ok(price) = price_text.parse::<MoneyCents>() else {
        println!("Invalid price format. Must be numeric.");
        return Ok(());
    };

    let stock_text = prompt("Initial Stock Quantity: ")?;
    let Ok(stock) = stock_text.parse::<i64>() else {
        println!("Invalid stock format. Must be an integer.");
        return Ok(());
    };

    match catalog.register(&name, price, stock) {
        Ok(product) => println!(
            "Product '{}' (ID: {}) has been registered in the system!",
            product.name, product.id
        ),
        Err(EngineError::DuplicateName(name)) => {
            println!("A product with the name '{name}' already exists.");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn modify_product(catalog: &mut Catalog) -> Result<()> {
    println!("\n=== Product Details Modification ===");
    if catalog.is_empty() {
        println!("No products available.");
        return Ok(());
    }

    views::render_catalog(catalog);
    let query = prompt("Enter Product ID or Name to Modify: ")?;

    // Owned snapshot so the prompts below do not hold a catalog borrow.
    let candidates: Vec<(String, String)> = catalog
        .find_candidates(&query)
        .into_iter()
        .map(|product| (product.id.clone(), product.name.clone()))
        .collect();

    let (id, name) = match candidates.as_slice() {
        [] => {
            println!("No product found matching '{query}' by ID or Name.");
            return Ok(());
        }
        [only] => only.clone(),
        many => {
            println!("Multiple products found matching that name:");
            for (index, (id, name)) in many.iter().enumerate() {
                println!("  {}. ID: {id}, Name: {name}", index + 1);
            }
            loop {
                let choice = prompt("Enter the number of the product you want to modify: ")?;
                match choice.parse::<usize>() {
                    Ok(number) if (1..=many.len()).contains(&number) => {
                        break many[number - 1].clone();
                    }
                    _ => println!("Invalid choice. Please enter a number from the list."),
                }
            }
        }
    };

    if let Some(product) = catalog.find_by_id(&id) {
        println!("\n--- Modifying: {name} (ID: {id}) ---");
        println!("  Current Price: ${}", product.price);
        println!("  Current Stock: {}", product.stock);
    }

    let price_text = prompt("Enter New Price (blank to keep): ")?;
    let new_price = if price_text.is_empty() {
        None
    } else {
        match price_text.parse::<MoneyCents>() {
            Ok(price) => Some(price),
            Err(_) => {
                println!("Invalid price input.");
                None
            }
        }
    };

    let stock_text = prompt("Enter New Stock Quantity (blank to keep): ")?;
    let new_stock = if stock_text.is_empty() {
        None
    } else {
        match stock_text.parse::<i64>() {
            Ok(stock) => Some(stock),
            Err(_) => {
                println!("Invalid stock input. Stock modification cancelled.");
                None
            }
        }
    };

    match catalog.update_fields(&id, new_price, new_stock) {
        Ok(report) => {
            match report.price {
                Some(Ok(price)) => println!("Price modified to ${price}"),
                Some(Err(err)) => println!("{err}"),
                None => {}
            }
            match report.stock {
                Some(Ok(stock)) => println!("Stock modified to {stock} units"),
                Some(Err(err)) => println!("{err}"),
                None => {}
            }
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn search_by_date(ledger: &Ledger) -> Result<()> {
    println!("\n##### Search Sales Records by Date #####");
    let date_text = prompt("Enter date to search (DD/MM/YYYY): ")?;

    match reports::by_date(ledger, &date_text) {
        Ok(matches) => {
            views::render_transactions(&matches, &format!("Sales Records for {date_text}"));
        }
        Err(_) => println!("Invalid date format. Please use DD/MM/YYYY."),
    }
    Ok(())
}

fn search_by_product_name(ledger: &Ledger, catalog: &Catalog) -> Result<()> {
    println!("\n##### Search Sales Records by Product Name #####");
    let query = prompt("Enter product name (partial match allowed): ")?;
    if query.is_empty() {
        println!("Product name query cannot be empty.");
        return Ok(());
    }

    match reports::by_product_name(ledger, catalog, &query) {
        Ok(matches) => views::render_transactions(
            &matches,
            &format!("Sales Records for Product Name containing '{query}'"),
        ),
        Err(EngineError::NotFound(_)) => println!("No products found matching '{query}'."),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn search_by_product_and_range(ledger: &Ledger, catalog: &Catalog) -> Result<()> {
    println!("\n##### Search Sales Records by Product Name and Date Range #####");
    let query = prompt("Enter product name (blank for all products): ")?;

    let start_text = prompt("Enter start date (DD/MM/YYYY): ")?;
    let end_text = prompt("Enter end date (DD/MM/YYYY): ")?;
    let (start, end) = match (dates::parse_date(&start_text), dates::parse_date(&end_text)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => {
            println!("Invalid date format. Please use DD/MM/YYYY. Search cancelled.");
            return Ok(());
        }
    };

    let name_query = if query.is_empty() { None } else { Some(query.as_str()) };
    match reports::by_product_and_date_range(ledger, catalog, name_query, start, end) {
        Ok(matches) => {
            let label = if query.is_empty() { "All Products" } else { query.as_str() };
            views::render_transactions(
                &matches,
                &format!("Sales for '{label}' between {start_text} and {end_text}"),
            );
        }
        Err(EngineError::InvalidRange(_)) => {
            println!("Start date cannot be after end date. Search cancelled.");
        }
        Err(EngineError::NotFound(_)) => {
            println!("No products found matching '{query}'. Search cancelled.");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn prompt_month_year(which: &str) -> Result<MonthKey> {
    loop {
        let text = prompt(&format!("Enter {which} month and year (MM/YYYY): "))?;
        match dates::parse_month_year(&text) {
            Ok(key) => return Ok(key),
            Err(_) => println!("Invalid format. Please use MM/YYYY."),
        }
    }
}

fn overall_monthly_sales(ledger: &Ledger) -> Result<()> {
    println!("\n##### Display Overall Monthly Sales Performance #####");
    let start = prompt_month_year("start")?;
    let end = prompt_month_year("end")?;

    if ledger.is_empty() {
        println!("No transactions available to generate graphs.");
        return Ok(());
    }

    let buckets = reports::monthly_aggregate(ledger, None, start, end, false);
    charts::render_monthly("Overall Monthly Sales Performance", &buckets, "sales");
    Ok(())
}

fn product_monthly_sales(ledger: &Ledger, catalog: &Catalog) -> Result<()> {
    println!("\n##### Display Monthly Sales Performance for a Specific Product #####");
    if catalog.is_empty() {
        println!("Inventory is empty.");
        return Ok(());
    }

    views::render_catalog(catalog);
    let product_id = prompt("\nEnter Product ID to analyze: ")?;
    let Some(product) = catalog.find_by_id(&product_id) else {
        println!("Product ID '{product_id}' not found.");
        return Ok(());
    };
    let title = format!("Monthly Sales Performance for {}", product.name);

    let start = prompt_month_year("start")?;
    let end = prompt_month_year("end")?;

    let buckets = reports::monthly_aggregate(ledger, Some(&product_id), start, end, true);
    charts::render_monthly(&title, &buckets, "units sold");
    Ok(())
}

fn product_total_sales(ledger: &Ledger, catalog: &Catalog) -> Result<()> {
    println!("\n=== Display Total Sales Value Per Product ===");
    let start_text = prompt("Enter start date (DD/MM/YYYY): ")?;
    let end_text = prompt("Enter end date (DD/MM/YYYY): ")?;
    let (start, end) = match (dates::parse_date(&start_text), dates::parse_date(&end_text)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => {
            println!("Invalid date format. Please use DD/MM/YYYY. Chart cancelled.");
            return Ok(());
        }
    };

    match reports::per_product_totals(ledger, catalog, start, end) {
        Ok(totals) => charts::render_product_totals(
            &format!("Total Sales Value per Product ({start_text} - {end_text})"),
            &totals,
        ),
        Err(EngineError::InvalidRange(_)) => {
            println!("Start date cannot be after end date. Chart cancelled.");
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}
