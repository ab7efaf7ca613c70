use super::{LayoutNode, TextRole, TrendStyle};
use crate::models::{format_currency, CardGroup, MetricCard, MetricsSnapshot, TrendDirection};

pub fn trend_style(card: &MetricCard) -> TrendStyle {
    if card.is_positive {
        TrendStyle::Positive
    } else {
        TrendStyle::Neutral
    }
}

pub fn render_card_row(card: &MetricCard) -> LayoutNode {
    LayoutNode::hstack(vec![
        LayoutNode::vstack(vec![
            LayoutNode::text(TextRole::Body, card.title.as_str()),
            LayoutNode::text(TextRole::Caption, card.subtitle.as_str()),
        ]),
        LayoutNode::vstack(vec![
            LayoutNode::text(TextRole::Title, card.value.as_str()),
            LayoutNode::Badge {
                style: trend_style(card),
                direction: card.trend_direction,
                text: card.trend_text.clone(),
            },
        ]),
    ])
}

pub fn render_group(group: &CardGroup) -> LayoutNode {
    let mut children = Vec::with_capacity(group.cards.len() * 2);
    for (index, card) in group.cards.iter().enumerate() {
        if index > 0 {
            children.push(LayoutNode::Divider);
        }
        children.push(render_card_row(card));
    }
    LayoutNode::Card {
        title: group.section.title().to_string(),
        children,
    }
}

pub fn render_sections(groups: &[CardGroup]) -> LayoutNode {
    LayoutNode::vstack(groups.iter().map(render_group).collect())
}

pub fn snapshot_cards(snapshot: &MetricsSnapshot) -> Vec<MetricCard> {
    vec![
        MetricCard::new(
            "Customers",
            &snapshot.customers_today.to_string(),
            "Seen today",
            TrendDirection::Flat,
            "Today",
            snapshot.customers_today > 0,
        ),
        MetricCard::new(
            "Tasks Due",
            &snapshot.tasks_due_today.to_string(),
            "Due today",
            TrendDirection::Flat,
            "Today",
            false,
        ),
        MetricCard::new(
            "Overdue Tasks",
            &snapshot.overdue_tasks.to_string(),
            "Past due date",
            if snapshot.overdue_tasks > 0 {
                TrendDirection::Up
            } else {
                TrendDirection::Flat
            },
            &format!("{} overdue", snapshot.overdue_tasks),
            snapshot.overdue_tasks == 0,
        ),
        MetricCard::new(
            "Revenue",
            &format_currency(snapshot.total_revenue),
            "Total collected",
            TrendDirection::Flat,
            "Today",
            snapshot.total_revenue > 0.0,
        ),
        MetricCard::new(
            "Pending Invoices",
            &snapshot.pending_invoices.to_string(),
            "Awaiting payment",
            TrendDirection::Flat,
            &format!("{} open", snapshot.pending_invoices),
            snapshot.pending_invoices == 0,
        ),
    ]
}
