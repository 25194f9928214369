//! Text and JSON rendering of a loaded downline.
//!
//! Every view is built from the same [`Downline`], so the numbers printed
//! by the flat, levels and tree views always agree.

use downline_engine::Downline;
use downline_types::{AccountSnapshot, TraversalNode};
use downline_views::format::{format_earnings, grade_badge, plural, short_address};
use downline_views::{
    DownlineTree, FlatList, FlatListOptions, LevelGrouping, PageLink, TreeOptions, TreeRow,
};

use crate::config::{DownlineConfig, OutputFormat, ViewKind};
use crate::error::CliError;

/// Render `downline` the way `config` asks for.
pub fn render(downline: &Downline, config: &DownlineConfig) -> Result<String, CliError> {
    let settings = &config.downline;
    if settings.output == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(downline)?);
    }

    let mut lines = header(downline, config);
    lines.push(String::new());

    if downline.is_empty() {
        lines.push("No members found in this downline.".to_owned());
        return Ok(lines.join("\n"));
    }

    let body = match settings.view {
        ViewKind::Flat => render_flat(downline.nodes(), settings.page_size, settings.page),
        ViewKind::Levels => render_levels(downline.nodes(), settings.level),
        ViewKind::Tree => render_tree(&downline.root, downline.nodes(), settings.expand_all),
    };
    lines.extend(body);
    Ok(lines.join("\n"))
}

/// Root summary and traversal counters.
fn header(downline: &Downline, config: &DownlineConfig) -> Vec<String> {
    let root = &downline.root;
    let deepest = downline.nodes().iter().map(|n| n.depth).max().unwrap_or(0);

    let mut lines = vec![
        format!("Downline of {}", root.address),
        format!("  {}", config.explorer_link(root.address)),
        format!(
            "  {}  |  network {}  |  earned {}",
            grade_badge(root),
            root.network_count,
            format_earnings(root.total_earnings)
        ),
        format!(
            "Found {} across {} (max depth {})",
            plural(downline.len(), "member"),
            plural(usize::try_from(deepest).unwrap_or(0), "level"),
            downline.max_depth
        ),
    ];

    let report = downline.report;
    if report.dropped_branches > 0 || report.child_list_failures > 0 {
        lines.push(format!(
            "Warning: {} unreadable, {} without referral list",
            plural(report.dropped_branches, "account"),
            plural(report.child_list_failures, "account"),
        ));
    }
    lines
}

/// One member as a table cell run.
fn member_line(snapshot: &AccountSnapshot) -> String {
    format!(
        "{}  {:<16}  sponsor {}  network {:>5}  earned {:>12}",
        short_address(snapshot.address),
        grade_badge(snapshot),
        short_address(snapshot.sponsor),
        snapshot.network_count,
        format_earnings(snapshot.total_earnings)
    )
}

/// One page of the flat list, with a pagination bar.
fn render_flat(nodes: &[TraversalNode], page_size: usize, page: usize) -> Vec<String> {
    let mut list = FlatList::new(nodes, FlatListOptions { page_size });
    list.go_to_page(page);

    let mut lines: Vec<String> = list
        .current_items()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            format!(
                "{:>4}. L{:<2} {}",
                list.global_index(i),
                node.depth,
                member_line(&node.snapshot)
            )
        })
        .collect();

    if let Some((first, last)) = list.range() {
        lines.push(String::new());
        lines.push(format!(
            "Showing {first} to {last} of {}",
            plural(list.len(), "member")
        ));
    }
    if list.total_pages() > 1 {
        let bar: Vec<String> = list
            .page_window()
            .into_iter()
            .map(|link| match link {
                PageLink::Page(n) if n == list.page() => format!("[{n}]"),
                PageLink::Page(n) => n.to_string(),
                PageLink::Ellipsis => "...".to_owned(),
            })
            .collect();
        lines.push(format!("Pages: {}", bar.join(" ")));
    }
    lines
}

/// Per-level counts, then the members of the selected level.
fn render_levels(nodes: &[TraversalNode], level: Option<u32>) -> Vec<String> {
    let mut grouping = LevelGrouping::new(nodes);
    if let Some(level) = level {
        grouping.select_level(level);
    }

    let summary: Vec<String> = grouping
        .summary()
        .into_iter()
        .map(|(depth, count)| {
            if depth == grouping.selected_level() {
                format!("[Level {depth}: {count}]")
            } else {
                format!("Level {depth}: {count}")
            }
        })
        .collect();

    let members = grouping.current_members();
    let mut lines = vec![
        summary.join("  "),
        String::new(),
        format!(
            "Level {} ({})",
            grouping.selected_level(),
            plural(members.len(), "member")
        ),
    ];
    lines.extend(
        members
            .iter()
            .enumerate()
            .map(|(i, node)| format!("{:>4}. {}", i.saturating_add(1), member_line(&node.snapshot))),
    );
    lines
}

/// The visible rows of the sponsor tree, indented by depth.
fn render_tree(root: &AccountSnapshot, nodes: &[TraversalNode], expand_all: bool) -> Vec<String> {
    let mut tree = DownlineTree::new(root, nodes, TreeOptions::default());
    if expand_all {
        tree.expand_all();
    }
    tree.visible_rows().iter().map(tree_line).collect()
}

fn tree_line(row: &TreeRow<'_>) -> String {
    let indent = "  ".repeat(usize::try_from(row.depth).unwrap_or(0));
    let marker = match (row.has_children, row.expanded) {
        (false, _) => "-",
        (true, true) => "v",
        (true, false) => ">",
    };
    let badge = row
        .downline
        .map(|n| format!(" (+{n})"))
        .unwrap_or_default();
    format!(
        "{indent}{marker} {} {}{badge}",
        short_address(row.snapshot.address),
        grade_badge(row.snapshot)
    )
}
