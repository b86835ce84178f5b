//! Diesel expressions for the extension's distance operators.

use diesel::expression::{AsExpression, Expression};
use diesel::pg::Pg;
use diesel::sql_types::{Array, Float, Float4, Nullable, SqlType, Text};

diesel::infix_operator!(L2Distance, " <-> ", Float, backend: Pg);
diesel::infix_operator!(MaxInnerProduct, " <#> ", Float, backend: Pg);
diesel::infix_operator!(CosineDistance, " <=> ", Float, backend: Pg);

/// Distance methods for embedding columns and expressions.
///
/// The right operand may be another expression or anything convertible
/// to the column's SQL type, in particular [`Vector`] literals. Outputs
/// are typed as `Float` for ordering and filtering.
///
/// [`Vector`]: crate::Vector
pub trait LanternExpressionMethods: Expression + Sized {
    /// Euclidean distance (`<->`).
    ///
    /// The shipping extension returns the squared distance for this
    /// operator. Orderings are unaffected; compare against squared
    /// thresholds when filtering on the value.
    fn l2_distance<T>(self, other: T) -> L2Distance<Self, T::Expression>
    where
        Self::SqlType: SqlType,
        T: AsExpression<Self::SqlType>,
    {
        L2Distance::new(self, other.as_expression())
    }

    /// Max inner product (`<#>`).
    fn max_inner_product<T>(self, other: T) -> MaxInnerProduct<Self, T::Expression>
    where
        Self::SqlType: SqlType,
        T: AsExpression<Self::SqlType>,
    {
        MaxInnerProduct::new(self, other.as_expression())
    }

    /// Cosine distance (`<=>`).
    fn cosine_distance<T>(self, other: T) -> CosineDistance<Self, T::Expression>
    where
        Self::SqlType: SqlType,
        T: AsExpression<Self::SqlType>,
    {
        CosineDistance::new(self, other.as_expression())
    }
}

impl<T: Expression> LanternExpressionMethods for T {}

diesel::define_sql_function! {
    /// Computes a text embedding with the named model (requires `lantern_extras`).
    fn text_embedding(model: Text, input: Text) -> Nullable<Array<Float4>>;
}

diesel::define_sql_function! {
    /// Computes an image embedding for the image at `url` with the named
    /// model (requires `lantern_extras`).
    fn image_embedding(model: Text, url: Text) -> Nullable<Array<Float4>>;
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;
    use diesel::prelude::*;

    use super::*;
    use crate::Vector;

    diesel::table! {
        items (id) {
            id -> BigInt,
            embedding -> Nullable<Array<Float4>>,
        }
    }

    fn query_vector() -> Vector {
        Vector::from(vec![1.0, 1.0, 1.0])
    }

    #[test]
    fn l2_distance_renders_operator() {
        let query = items::table
            .select(items::id)
            .order(items::embedding.l2_distance(query_vector()));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"items\".\"embedding\" <-> $1"), "{sql}");
    }

    #[test]
    fn max_inner_product_renders_operator() {
        let query = items::table
            .select(items::id)
            .order(items::embedding.max_inner_product(query_vector()));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"items\".\"embedding\" <#> $1"), "{sql}");
    }

    #[test]
    fn cosine_distance_renders_operator() {
        let query = items::table
            .select(items::id)
            .order(items::embedding.cosine_distance(query_vector()));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"items\".\"embedding\" <=> $1"), "{sql}");
    }

    #[test]
    fn distance_usable_in_filters() {
        let query = items::table
            .select(items::id)
            .filter(items::embedding.l2_distance(query_vector()).lt(1.0_f32));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"items\".\"embedding\" <-> $1 < $2"), "{sql}");
    }

    #[test]
    fn distance_between_columns() {
        let query = items::table
            .select(items::embedding.cosine_distance(items::embedding));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(
            sql.contains("\"items\".\"embedding\" <=> \"items\".\"embedding\""),
            "{sql}",
        );
    }

    #[test]
    fn embedding_functions_render_calls() {
        let query = items::table
            .select(items::id)
            .order(items::embedding.cosine_distance(text_embedding(
                "BAAI/bge-small-en",
                "the quick brown fox",
            )));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("text_embedding($1, $2)"), "{sql}");

        let query = items::table.select(image_embedding(
            "clip/ViT-B-32-visual",
            "https://lantern.dev/images/home/footer.png",
        ));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("image_embedding($1, $2)"), "{sql}");
    }
}
