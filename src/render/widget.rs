use super::{LayoutNode, TextRole};
use crate::models::{format_currency, SizeClass, TimelineEntry, WidgetField};

const SMALL_FIELDS: &[WidgetField] = &[WidgetField::ActiveValue, WidgetField::ActiveLabel];

const MEDIUM_FIELDS: &[WidgetField] = &[
    WidgetField::ActiveValue,
    WidgetField::ActiveLabel,
    WidgetField::SecondaryValue,
    WidgetField::SecondaryLabel,
];

const LARGE_FIELDS: &[WidgetField] = &[
    WidgetField::ActiveValue,
    WidgetField::ActiveLabel,
    WidgetField::SecondaryValue,
    WidgetField::SecondaryLabel,
    WidgetField::OverdueTasks,
    WidgetField::TotalRevenue,
    WidgetField::PendingInvoices,
    WidgetField::UpdatedAt,
];

// Each size class draws every field of the smaller ones.
pub fn fields_for(size: SizeClass) -> &'static [WidgetField] {
    match size {
        SizeClass::Small => SMALL_FIELDS,
        SizeClass::Medium => MEDIUM_FIELDS,
        SizeClass::Large => LARGE_FIELDS,
    }
}

pub fn render_entry(entry: &TimelineEntry, size: SizeClass) -> LayoutNode {
    let fields = fields_for(size);
    let has = |field: WidgetField| fields.contains(&field);

    let primary = LayoutNode::vstack(vec![
        render_field(entry, WidgetField::ActiveValue),
        render_field(entry, WidgetField::ActiveLabel),
    ]);
    let headline = if has(WidgetField::SecondaryValue) {
        LayoutNode::hstack(vec![
            primary,
            LayoutNode::vstack(vec![
                render_field(entry, WidgetField::SecondaryValue),
                render_field(entry, WidgetField::SecondaryLabel),
            ]),
        ])
    } else {
        primary
    };
    let mut rows = vec![headline];

    if has(WidgetField::OverdueTasks) {
        rows.push(LayoutNode::Divider);
        rows.push(LayoutNode::vstack(
            [
                WidgetField::OverdueTasks,
                WidgetField::TotalRevenue,
                WidgetField::PendingInvoices,
            ]
            .into_iter()
            .map(|field| render_field(entry, field))
            .collect(),
        ));
        rows.push(render_field(entry, WidgetField::UpdatedAt));
    }

    LayoutNode::Themed {
        colors: entry.configuration.color_theme.colors(),
        child: Box::new(LayoutNode::vstack(rows)),
    }
}

fn render_field(entry: &TimelineEntry, field: WidgetField) -> LayoutNode {
    let snapshot = &entry.snapshot;
    let secondary = entry.active_metric.other();
    match field {
        WidgetField::ActiveValue => LayoutNode::field(field, TextRole::Headline, entry.display_value()),
        WidgetField::ActiveLabel => LayoutNode::field(field, TextRole::Caption, entry.active_metric.label()),
        WidgetField::SecondaryValue => {
            LayoutNode::field(field, TextRole::Title, snapshot.count_for(secondary).to_string())
        }
        WidgetField::SecondaryLabel => LayoutNode::field(field, TextRole::Caption, secondary.label()),
        WidgetField::OverdueTasks => {
            LayoutNode::field(field, TextRole::Body, format!("{} overdue", snapshot.overdue_tasks))
        }
        WidgetField::TotalRevenue => LayoutNode::field(
            field,
            TextRole::Body,
            format!("{} revenue", format_currency(snapshot.total_revenue)),
        ),
        WidgetField::PendingInvoices => LayoutNode::field(
            field,
            TextRole::Body,
            format!("{} pending invoices", snapshot.pending_invoices),
        ),
        WidgetField::UpdatedAt => LayoutNode::field(
            field,
            TextRole::Caption,
            format!("Updated {}", entry.timestamp.format("%H:%M UTC")),
        ),
    }
}
