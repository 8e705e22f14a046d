use std::borrow::Cow;
use std::slice::Iter;

/// A label name.
pub type LabelName = Cow<'static, str>;

/// A single `name="value"` pair qualifying a metric sample.
///
/// Labels order lexicographically by name, then by value, and compare structurally.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label {
    name: LabelName,
    value: Cow<'static, str>,
}

impl Label {
    /// Creates a [`Label`] from a name and value.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<Cow<'static, str>>,
    {
        Label { name: name.into(), value: value.into() }
    }

    /// Creates a [`Label`] from a static name and value.
    pub const fn from_static_parts(name: &'static str, value: &'static str) -> Self {
        Label { name: Cow::Borrowed(name), value: Cow::Borrowed(value) }
    }

    /// Name of this label.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Value of this label.
    pub fn value(&self) -> &str {
        self.value.as_ref()
    }
}

impl<N, V> From<(N, V)> for Label
where
    N: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    fn from(pair: (N, V)) -> Label {
        Label::new(pair.0, pair.1)
    }
}

/// The complete set of labels identifying one series.
///
/// Labels are kept in canonical order, so two sets built from the same labels in a different
/// order are equal, hash identically, and serialize identically.  Exact duplicates collapse into
/// one entry.  Two labels sharing a name but not a value are both kept; families reject such sets.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LabelSet(Vec<Label>);

impl LabelSet {
    /// Creates an empty label set.
    pub const fn empty() -> Self {
        LabelSet(Vec::new())
    }

    /// Number of labels in this set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether or not this set has no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the labels in canonical order.
    pub fn iter(&self) -> Iter<'_, Label> {
        self.0.iter()
    }

    /// Gets the value of the first label with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|label| label.name() == name).map(Label::value)
    }

    /// Finds the first name that appears on more than one label.
    pub(crate) fn repeated_name(&self) -> Option<&str> {
        self.0.windows(2).find(|pair| pair[0].name == pair[1].name).map(|pair| pair[0].name())
    }
}

impl<L> FromIterator<L> for LabelSet
where
    L: Into<Label>,
{
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut labels = iter.into_iter().map(Into::into).collect::<Vec<Label>>();
        labels.sort();
        labels.dedup();
        LabelSet(labels)
    }
}

impl<L, const N: usize> From<[L; N]> for LabelSet
where
    L: Into<Label>,
{
    fn from(labels: [L; N]) -> Self {
        labels.into_iter().collect()
    }
}

impl From<Vec<Label>> for LabelSet {
    fn from(labels: Vec<Label>) -> Self {
        labels.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
