//! [`Record`] implementations for the typed forest datasets.

use forest_dash_forest_models::{
    DynamicsField, DynamicsRecord, ForestAreaTrendRecord, LandAreaField, LandAreaRecord,
    OwnershipField, OwnershipRecord, TimberField, TimberVolumeRecord, TrendField,
};

use crate::record::Record;
use crate::value::Value;

fn text(s: &str) -> Option<Value> {
    Some(Value::from(s))
}

fn num(n: Option<f64>) -> Option<Value> {
    Some(Value::from(n))
}

impl Record for LandAreaRecord {
    type Field = LandAreaField;

    fn get(&self, field: &LandAreaField) -> Option<Value> {
        match field {
            LandAreaField::Region => text(&self.region),
            LandAreaField::Subregion => text(&self.subregion),
            LandAreaField::State => text(&self.state),
            LandAreaField::TotalLandArea => num(self.total_land_area),
            LandAreaField::TotalForestLand => num(self.total_forest_land),
            LandAreaField::TotalTimberland => num(self.total_timberland),
            LandAreaField::PlantedTimberland => num(self.planted_timberland),
            LandAreaField::NaturalTimberland => num(self.natural_timberland),
            LandAreaField::ProductiveReserved => num(self.productive_reserved),
            LandAreaField::UnproductiveReserved => num(self.unproductive_reserved),
            LandAreaField::OtherForest => num(self.other_forest),
            LandAreaField::WoodlandArea => num(self.woodland_area),
            LandAreaField::OtherLand => num(self.other_land),
        }
    }
}

impl Record for OwnershipRecord {
    type Field = OwnershipField;

    fn get(&self, field: &OwnershipField) -> Option<Value> {
        match field {
            OwnershipField::Region => text(&self.region),
            OwnershipField::Subregion => text(&self.subregion),
            OwnershipField::State => text(&self.state),
            OwnershipField::AllOwnerships => num(self.all_ownerships),
            OwnershipField::TotalPublic => num(self.total_public),
            OwnershipField::TotalFederal => num(self.total_federal),
            OwnershipField::NationalForest => num(self.national_forest),
            OwnershipField::Blm => num(self.blm),
            OwnershipField::OtherFederal => num(self.other_federal),
            OwnershipField::StateOwned => num(self.state_owned),
            OwnershipField::CountyMunicipal => num(self.county_municipal),
            OwnershipField::TotalPrivate => num(self.total_private),
            OwnershipField::PrivateCorporate => num(self.private_corporate),
            OwnershipField::PrivateNoncorporate => num(self.private_noncorporate),
        }
    }
}

impl Record for TimberVolumeRecord {
    type Field = TimberField;

    fn get(&self, field: &TimberField) -> Option<Value> {
        match field {
            TimberField::Region => text(&self.region),
            TimberField::Subregion => text(&self.subregion),
            TimberField::State => text(&self.state),
            TimberField::AllTimberTotal => num(self.all_timber_total),
            TimberField::AllTimberSoftwoods => num(self.all_timber_softwoods),
            TimberField::AllTimberHardwoods => num(self.all_timber_hardwoods),
            TimberField::GrowingStockTotal => num(self.growing_stock_total),
            TimberField::GrowingStockSoftwoods => num(self.growing_stock_softwoods),
            TimberField::GrowingStockHardwoods => num(self.growing_stock_hardwoods),
            TimberField::CullTotal => num(self.cull_total),
            TimberField::CullSoftwoods => num(self.cull_softwoods),
            TimberField::CullHardwoods => num(self.cull_hardwoods),
            TimberField::SoundDeadTotal => num(self.sound_dead_total),
            TimberField::SoundDeadSoftwoods => num(self.sound_dead_softwoods),
            TimberField::SoundDeadHardwoods => num(self.sound_dead_hardwoods),
        }
    }
}

impl Record for DynamicsRecord {
    type Field = DynamicsField;

    fn get(&self, field: &DynamicsField) -> Option<Value> {
        match field {
            DynamicsField::Region => text(&self.region),
            DynamicsField::Subregion => Some(Value::from(self.subregion.clone())),
            DynamicsField::SpeciesGroup => text(&self.species_group),
            DynamicsField::Year => Some(Value::from(self.year)),
            DynamicsField::Growth => num(self.growth),
            DynamicsField::Mortality => num(self.mortality),
            DynamicsField::Removals => num(self.removals),
            DynamicsField::NetChange => num(self.net_change),
        }
    }
}

impl Record for ForestAreaTrendRecord {
    type Field = TrendField;

    fn get(&self, field: &TrendField) -> Option<Value> {
        match field {
            TrendField::Region => text(&self.region),
            TrendField::Subregion => text(&self.subregion),
            TrendField::State => text(&self.state),
            TrendField::Year => Some(Value::from(self.year)),
            TrendField::Area => num(self.area),
        }
    }
}
