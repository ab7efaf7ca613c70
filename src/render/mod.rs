pub mod dashboard;
pub mod widget;

use crate::models::{ThemeColors, TrendDirection, WidgetField};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextRole {
    Headline,
    Title,
    Body,
    Caption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendStyle {
    Positive,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutNode {
    Themed {
        colors: ThemeColors,
        child: Box<LayoutNode>,
    },
    Stack {
        axis: Axis,
        children: Vec<LayoutNode>,
    },
    Card {
        title: String,
        children: Vec<LayoutNode>,
    },
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<WidgetField>,
        role: TextRole,
        content: String,
    },
    Badge {
        style: TrendStyle,
        direction: TrendDirection,
        text: String,
    },
    Divider,
}

impl LayoutNode {
    pub fn text(role: TextRole, content: impl Into<String>) -> Self {
        Self::Text {
            field: None,
            role,
            content: content.into(),
        }
    }

    pub fn field(field: WidgetField, role: TextRole, content: impl Into<String>) -> Self {
        Self::Text {
            field: Some(field),
            role,
            content: content.into(),
        }
    }

    pub fn vstack(children: Vec<LayoutNode>) -> Self {
        Self::Stack {
            axis: Axis::Vertical,
            children,
        }
    }

    pub fn hstack(children: Vec<LayoutNode>) -> Self {
        Self::Stack {
            axis: Axis::Horizontal,
            children,
        }
    }

    pub fn children(&self) -> &[LayoutNode] {
        match self {
            Self::Themed { child, .. } => std::slice::from_ref(&**child),
            Self::Stack { children, .. } | Self::Card { children, .. } => children,
            Self::Text { .. } | Self::Badge { .. } | Self::Divider => &[],
        }
    }

    pub fn fields(&self) -> BTreeSet<WidgetField> {
        let mut fields = BTreeSet::new();
        self.visit(&mut |node| {
            if let Self::Text { field: Some(field), .. } = node {
                fields.insert(*field);
            }
        });
        fields
    }

    pub fn visit(&self, visitor: &mut impl FnMut(&LayoutNode)) {
        visitor(self);
        for child in self.children() {
            child.visit(visitor);
        }
    }
}
