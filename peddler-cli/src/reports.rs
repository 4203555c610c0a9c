use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use peddler_game::{MarketSnapshot, OfferEntry, PriceAdjuster};

fn visit_label(snapshot: &MarketSnapshot) -> String {
    match snapshot.visit {
        Some(visit) if snapshot.rotated => format!("visit {visit} (new stock)"),
        Some(visit) => format!("visit {visit}"),
        None => "black market".to_string(),
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    snapshots: &[MarketSnapshot],
    adjuster: &PriceAdjuster,
) -> Result<()> {
    for snapshot in snapshots {
        let heading = format!(
            "🏪 {} [{}] - {}",
            snapshot.location,
            snapshot.tier,
            visit_label(snapshot)
        );
        if snapshot.mode.is_black_market() {
            writeln!(out, "{}", heading.bright_magenta().bold())?;
        } else {
            writeln!(out, "{}", heading.bright_cyan().bold())?;
            writeln!(
                out,
                "Categories: {}",
                snapshot.active_categories.join(", ").yellow()
            )?;
        }
        writeln!(out, "{}", "-".repeat(40).cyan())?;

        writeln!(out, "{}", "Buy".green().bold())?;
        write_console_entries(out, &snapshot.buy_list, |entry| u64::from(entry.price), |entry| {
            snapshot.specialty_buy_item.as_deref() == Some(entry.item_name.as_str())
        })?;

        writeln!(out, "{}", "Sell".red().bold())?;
        write_console_entries(
            out,
            &snapshot.sell_list,
            |entry| adjuster.sell_payout(entry.price, 1, snapshot.mode),
            |entry| snapshot.rarity_sell_item.as_deref() == Some(entry.item_name.as_str()),
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_console_entries(
    out: &mut dyn Write,
    entries: &[OfferEntry],
    price: impl Fn(&OfferEntry) -> u64,
    featured: impl Fn(&OfferEntry) -> bool,
) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "   (nothing on offer)")?;
        return Ok(());
    }
    for entry in entries {
        let marker = if featured(entry) { "★" } else { " " };
        writeln!(
            out,
            "  {marker} {:20} {:>7}  {}",
            entry.item_name,
            price(entry),
            entry.category.dimmed()
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, snapshots: &[MarketSnapshot]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(snapshots)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    snapshots: &[MarketSnapshot],
    adjuster: &PriceAdjuster,
) -> Result<()> {
    writeln!(out, "# Peddler Market Report\n")?;

    for snapshot in snapshots {
        writeln!(
            out,
            "## {} ({}, {})\n",
            snapshot.location,
            snapshot.tier,
            visit_label(snapshot)
        )?;
        if !snapshot.mode.is_black_market() {
            writeln!(
                out,
                "- **Categories**: {}\n",
                snapshot.active_categories.join(", ")
            )?;
        }

        writeln!(
            out,
            "- **RNG draws**: {} rotation, {} offers\n",
            snapshot.draws.rotation, snapshot.draws.offers
        )?;

        writeln!(out, "### Buy\n")?;
        writeln!(out, "| Item | Category | Price |")?;
        writeln!(out, "|------|----------|-------|")?;
        for entry in &snapshot.buy_list {
            writeln!(
                out,
                "| {} | {} | {} |",
                entry.item_name, entry.category, entry.price
            )?;
        }

        writeln!(out, "\n### Sell\n")?;
        writeln!(out, "| Item | Category | Payout |")?;
        writeln!(out, "|------|----------|--------|")?;
        for entry in &snapshot.sell_list {
            writeln!(
                out,
                "| {} | {} | {} |",
                entry.item_name,
                entry.category,
                adjuster.sell_payout(entry.price, 1, snapshot.mode)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peddler_game::{DrawCounts, MarketMode, Tier};

    fn snapshot(mode: MarketMode) -> MarketSnapshot {
        MarketSnapshot {
            location: "Bau".to_string(),
            tier: Tier::Village,
            mode,
            visit: (!mode.is_black_market()).then_some(1),
            active_categories: vec!["Herbs".to_string()],
            rotated: true,
            buy_list: vec![OfferEntry {
                item_name: "Herb".to_string(),
                price: 100,
                category: "Herbs".to_string(),
            }],
            sell_list: vec![OfferEntry {
                item_name: "Root".to_string(),
                price: 99,
                category: "Herbs".to_string(),
            }],
            specialty_buy_item: Some("Herb".to_string()),
            rarity_sell_item: None,
            draws: DrawCounts {
                rotation: 2,
                offers: 7,
            },
        }
    }

    #[test]
    fn markdown_lists_black_market_payout() {
        let mut buf = Vec::new();
        generate_markdown_report(
            &mut buf,
            &[snapshot(MarketMode::BlackMarket)],
            &PriceAdjuster::default(),
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Peddler Market Report"));
        assert!(text.contains("| Root | Herbs | 149 |"));
        assert!(!text.contains("**Categories**"));
        assert!(text.contains("- **RNG draws**: 2 rotation, 7 offers"));
    }

    #[test]
    fn console_marks_specialty_item() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(
            &mut buf,
            &[snapshot(MarketMode::Normal)],
            &PriceAdjuster::default(),
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("visit 1 (new stock)"));
        assert!(text.contains("★ Herb"));
        assert!(text.contains("Categories: Herbs"));
    }

    #[test]
    fn json_round_trips_snapshots() {
        let mut buf = Vec::new();
        let snapshots = vec![snapshot(MarketMode::Normal)];
        generate_json_report(&mut buf, &snapshots).unwrap();
        let parsed: Vec<MarketSnapshot> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, snapshots);
    }
}
