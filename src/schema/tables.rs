//! Built-in schemas for the published 2001/2011 tables.
//!
//! One declarative block per table replaces the old one-class-per-table
//! approach. Data columns are assigned consecutively from column 1 (column 0
//! is the zone code) unless a field names its columns explicitly, so each
//! block reads top-to-bottom in publication order.
//!
//! KS013 (qualifications) and KS015 (travel to work) are published with
//! country-specific layouts and are registered per country; every other
//! table shares one layout across England/Wales, Scotland and Northern
//! Ireland.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::schema::registry::{Country, SchemaRegistry};
use crate::schema::types::{FieldSpec, TableSchema};

/// The process-wide registry of built-in table schemas.
pub static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(build_registry);

/// Resolve a built-in schema for a (table, country label) pair.
pub fn resolve(table: &str, country_label: &str) -> Result<Arc<TableSchema>> {
    BUILTIN.resolve_label(table, country_label)
}

fn build_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.insert(cas001());
    registry.insert(cas003());
    registry.insert(cas_area_easting_northing());
    registry.insert(ks002());
    registry.insert(ks006());
    registry.insert(ks008());
    registry.insert(ks009());
    registry.insert(ks010());
    registry.insert(ks011());
    registry.insert(ks012());
    registry.insert(ks013_england_wales());
    registry.insert(ks013_scotland());
    registry.insert(ks013_northern_ireland());
    registry.insert(ks014());
    registry.insert(ks015_england_wales());
    registry.insert(ks015_scotland());
    registry.insert(ks015_northern_ireland());
    registry.insert(ks016());
    registry.insert(ks017());
    registry.insert(ks018());
    registry.insert(ks019());
    registry.insert(ks020());
    registry
}

/// Declarative schema builder: assigns consecutive data columns as fields
/// are added.
struct Builder {
    table: &'static str,
    variant: Option<Country>,
    fields: Vec<FieldSpec>,
    next_column: usize,
}

impl Builder {
    fn table(table: &'static str) -> Builder {
        Builder {
            table,
            variant: None,
            fields: Vec::new(),
            next_column: 1,
        }
    }

    fn variant(mut self, country: Country) -> Builder {
        self.variant = Some(country);
        self
    }

    fn count(mut self, name: &str) -> Builder {
        self.fields.push(FieldSpec::count(name, self.next_column));
        self.next_column += 1;
        self
    }

    fn counts(mut self, names: &[&str]) -> Builder {
        for name in names {
            self = self.count(name);
        }
        self
    }

    /// One field summed from the next `span` raw columns.
    fn count_spanning(mut self, name: &str, span: usize) -> Builder {
        let columns: Vec<usize> = (self.next_column..self.next_column + span).collect();
        self.fields.push(FieldSpec::count_sum(name, &columns));
        self.next_column += span;
        self
    }

    fn measure(mut self, name: &str) -> Builder {
        self.fields.push(FieldSpec::measure(name, self.next_column));
        self.next_column += 1;
        self
    }

    fn build(self) -> TableSchema {
        TableSchema::new(self.table, self.variant, self.fields)
            .expect("builtin schema data is valid")
    }
}

/// CAS001: age by sex of all people resident in households and communal
/// establishments.
fn cas001() -> TableSchema {
    const BANDS: &[&str] = &[
        "0to4", "5to9", "10to14", "15to19", "20to24", "25to29", "30to34", "35to39", "40to44",
        "45to49", "50to54", "55to59", "60to64", "65to69", "70to74", "75to79", "80to84", "85to89",
        "90AndOver",
    ];
    let mut b = Builder::table("CAS001").counts(&["allPeople", "allMales", "allFemales"]);
    for band in BANDS {
        b = b.count(&format!("malesAge{band}"));
    }
    for band in BANDS {
        b = b.count(&format!("femalesAge{band}"));
    }
    b.build()
}

/// CAS003: age of Household Reference Person (HRP) by sex.
fn cas003() -> TableSchema {
    const BANDS: &[&str] = &[
        "19AndUnder", "20to24", "25to29", "30to44", "45to59", "60to64", "65to74", "75to84",
        "85AndOver",
    ];
    let mut b = Builder::table("CAS003").count("allHouseholds");
    for band in BANDS {
        b = b.count(&format!("maleHRPAge{band}"));
    }
    for band in BANDS {
        b = b.count(&format!("femaleHRPAge{band}"));
    }
    b.build()
}

/// The one real-valued table: zone geometry (hectares and grid reference).
fn cas_area_easting_northing() -> TableSchema {
    Builder::table("CASAreaEastingNorthing")
        .measure("area")
        .measure("easting")
        .measure("northing")
        .build()
}

/// KS002: age structure.
fn ks002() -> TableSchema {
    Builder::table("KS002")
        .counts(&[
            "allPeople",
            "peopleAge0to4",
            "peopleAge5to7",
            "peopleAge8to9",
            "peopleAge10to14",
            "peopleAge15",
            "peopleAge16to17",
            "peopleAge18to19",
            "peopleAge20to24",
            "peopleAge25to29",
            "peopleAge30to44",
            "peopleAge45to59",
            "peopleAge60to64",
            "peopleAge65to74",
            "peopleAge75to84",
            "peopleAge85to89",
            "peopleAge90AndOver",
        ])
        .build()
}

/// KS006: ethnic group.
fn ks006() -> TableSchema {
    Builder::table("KS006")
        .counts(&[
            "allPeople",
            "whiteBritish",
            "whiteIrish",
            "otherWhite",
            "mixedWhiteAndBlackCaribbean",
            "mixedWhiteAndBlackAfrican",
            "mixedWhiteAndAsian",
            "otherMixed",
            "indian",
            "pakistani",
            "bangladeshi",
            "otherAsian",
            "caribbean",
            "african",
            "otherBlack",
            "chinese",
            "otherEthnicGroup",
        ])
        .build()
}

/// KS008: health and provision of unpaid care.
fn ks008() -> TableSchema {
    Builder::table("KS008")
        .counts(&[
            "allPeople",
            "peopleWithGoodHealth",
            "peopleWithFairlyGoodHealth",
            "peopleWithNotGoodHealth",
            "peopleWithALimitingLongTermIllness",
            "peopleProviding1To19HoursUnpaidCarePerWeek",
            "peopleProviding20To49HoursUnpaidCarePerWeek",
            "peopleProviding50OrMoreHoursUnpaidCarePerWeek",
        ])
        .build()
}

/// KS009: economic activity.
fn ks009() -> TableSchema {
    Builder::table("KS009")
        .counts(&[
            "allPeopleAged16to74",
            "economicallyActiveEmployeesPartTime",
            "economicallyActiveEmployeesFullTime",
            "economicallyActiveSelfEmployed",
            "economicallyActiveUnemployed",
            "economicallyActiveFullTimeStudents",
            "economicallyInactiveRetired",
            "economicallyInactiveStudents",
            "economicallyInactiveLookingAfterHomeOrFamily",
            "economicallyInactivePermanentlySickOrDisabled",
            "economicallyInactiveOther",
            "unemployedPeopleAged16to24",
            "unemployedPeopleAged50AndOver",
            "unemployedPeopleWhoHaveNeverWorked",
            "longTermUnemployedPeople",
        ])
        .build()
}

/// KS010: hours worked.
fn ks010() -> TableSchema {
    Builder::table("KS010")
        .counts(&[
            "allPeopleAged16to74InEmployment",
            "malesWorkingPartTime",
            "malesWorkingFullTime",
            "malesWorking49OrMoreHoursPerWeek",
            "femalesWorkingPartTime",
            "femalesWorkingFullTime",
            "femalesWorking49OrMoreHoursPerWeek",
        ])
        .build()
}

/// KS011: industry of employment.
fn ks011() -> TableSchema {
    Builder::table("KS011")
        .counts(&[
            "allPeopleAged16to74InEmployment",
            "agricultureHuntingAndForestry",
            "fishing",
            "miningAndQuarrying",
            "manufacturing",
            "electricityGasAndWaterSupply",
            "construction",
            "wholesaleAndRetailTrade",
            "hotelsAndCatering",
            "transportStorageAndCommunication",
            "financialIntermediation",
            "realEstateRentingAndBusinessActivities",
            "publicAdministrationAndDefence",
            "education",
            "healthAndSocialWork",
            "otherIndustry",
        ])
        .build()
}

/// KS012: occupation groups.
fn ks012() -> TableSchema {
    Builder::table("KS012")
        .counts(&[
            "allPeopleAged16to74InEmployment",
            "managersAndSeniorOfficials",
            "professionalOccupations",
            "associateProfessionalAndTechnicalOccupations",
            "administrativeAndSecretarialOccupations",
            "skilledTradesOccupations",
            "personalServiceOccupations",
            "salesAndCustomerServiceOccupations",
            "processPlantAndMachineOperatives",
            "elementaryOccupations",
        ])
        .build()
}

/// KS013: qualifications, England/Wales layout.
fn ks013_england_wales() -> TableSchema {
    Builder::table("KS013")
        .variant(Country::EnglandWales)
        .counts(&[
            "allPeopleAged16to74",
            "peopleAged16to74WithNoQualifications",
            "peopleAged16to74WithHighestQualificationAttainedLevel1",
            "peopleAged16to74WithHighestQualificationAttainedLevel2",
            "peopleAged16to74WithHighestQualificationAttainedLevel3",
            "peopleAged16to74WithHighestQualificationAttainedLevel4and5",
            "peopleAged16to74WithOtherQualificationsLevelUnknown",
        ])
        .build()
}

/// KS013, Scotland layout: qualifications are published in four grouped
/// levels, so the harmonized field names cover a coarser breakdown.
fn ks013_scotland() -> TableSchema {
    Builder::table("KS013")
        .variant(Country::Scotland)
        .counts(&[
            "allPeopleAged16to74",
            "peopleAged16to74WithNoQualifications",
            "peopleAged16to74WithHighestQualificationAttainedLevel1",
            "peopleAged16to74WithHighestQualificationAttainedLevel2",
            "peopleAged16to74WithHighestQualificationAttainedLevel3",
            "peopleAged16to74WithHighestQualificationAttainedLevel4and5",
        ])
        .build()
}

/// KS013, Northern Ireland layout: levels 4 and 5 are published as two raw
/// columns and harmonized here by summing them, and the tail columns break
/// down people with no qualifications by age.
fn ks013_northern_ireland() -> TableSchema {
    Builder::table("KS013")
        .variant(Country::NorthernIreland)
        .counts(&[
            "allPeopleAged16to74",
            "peopleAged16to74WithNoQualifications",
            "peopleAged16to74WithHighestQualificationAttainedLevel1",
            "peopleAged16to74WithHighestQualificationAttainedLevel2",
            "peopleAged16to74WithHighestQualificationAttainedLevel3",
        ])
        .count_spanning("peopleAged16to74WithHighestQualificationAttainedLevel4and5", 2)
        .counts(&[
            "peopleAged16to74WithOtherQualificationsLevelUnknown",
            "peopleAged16to24WithNoQualifications",
            "peopleAged25to44WithNoQualifications",
            "peopleAged45to59WithNoQualifications",
            "peopleAged60to74WithNoQualifications",
        ])
        .build()
}

/// KS014: National Statistics Socio-economic Classification (NS-SeC).
fn ks014() -> TableSchema {
    Builder::table("KS014")
        .counts(&[
            "allPeopleAged16to74",
            "largeEmployersAndHigherManagerialOccupations",
            "higherProfessionalOccupations",
            "lowerManagerialAndProfessionalOccupations",
            "intermediateOccupations",
            "smallEmployersAndOwnAccountWorkers",
            "lowerSupervisoryAndTechnicalOccupations",
            "semiRoutineOccupations",
            "routineOccupations",
            "neverWorked",
            "longTermUnemployed",
            "fullTimeStudents",
            "notClassifiableForOtherReasons",
        ])
        .build()
}

/// KS015: travel to work, England/Wales layout.
fn ks015_england_wales() -> TableSchema {
    Builder::table("KS015")
        .variant(Country::EnglandWales)
        .counts(&[
            "peopleAged16to74InEmployment",
            "peopleWhoWorkMainlyAtOrFromHome",
            "travelToWorkByUndergroundMetroLightRailOrTram",
            "travelToWorkByTrain",
            "travelToWorkByBusMinibusOrCoach",
            "travelToWorkByMotorcycleScooterOrMoped",
            "travelToWorkDrivingACarOrVan",
            "travelToWorkAsAPassengerInACarOrVan",
            "travelToWorkByTaxiOrMinicab",
            "travelToWorkByBicycle",
            "travelToWorkOnFoot",
            "travelToWorkByOtherMethods",
            "averageDistanceInKmTravelledToFixedPlaceOfWork",
            "publicTransportUsersInHouseholdsWithACarOrVan",
            "publicTransportUsersInHouseholdsWithoutACarOrVan",
        ])
        .build()
}

/// KS015, Scotland layout: same categories, but train is published before
/// the underground/metro/tram column.
fn ks015_scotland() -> TableSchema {
    Builder::table("KS015")
        .variant(Country::Scotland)
        .counts(&[
            "peopleAged16to74InEmployment",
            "peopleWhoWorkMainlyAtOrFromHome",
            "travelToWorkByTrain",
            "travelToWorkByUndergroundMetroLightRailOrTram",
            "travelToWorkByBusMinibusOrCoach",
            "travelToWorkByMotorcycleScooterOrMoped",
            "travelToWorkDrivingACarOrVan",
            "travelToWorkAsAPassengerInACarOrVan",
            "travelToWorkByTaxiOrMinicab",
            "travelToWorkByBicycle",
            "travelToWorkOnFoot",
            "travelToWorkByOtherMethods",
            "averageDistanceInKmTravelledToFixedPlaceOfWork",
            "publicTransportUsersInHouseholdsWithACarOrVan",
            "publicTransportUsersInHouseholdsWithoutACarOrVan",
        ])
        .build()
}

/// KS015, Northern Ireland layout: no underground/metro category.
fn ks015_northern_ireland() -> TableSchema {
    Builder::table("KS015")
        .variant(Country::NorthernIreland)
        .counts(&[
            "peopleAged16to74InEmployment",
            "peopleWhoWorkMainlyAtOrFromHome",
            "travelToWorkByTrain",
            "travelToWorkByBusMinibusOrCoach",
            "travelToWorkByMotorcycleScooterOrMoped",
            "travelToWorkDrivingACarOrVan",
            "travelToWorkAsAPassengerInACarOrVan",
            "travelToWorkByTaxiOrMinicab",
            "travelToWorkByBicycle",
            "travelToWorkOnFoot",
            "travelToWorkByOtherMethods",
            "averageDistanceInKmTravelledToFixedPlaceOfWork",
            "publicTransportUsersInHouseholdsWithACarOrVan",
            "publicTransportUsersInHouseholdsWithoutACarOrVan",
        ])
        .build()
}

/// KS016: household spaces and accommodation type.
fn ks016() -> TableSchema {
    Builder::table("KS016")
        .counts(&[
            "allHouseholdSpaces",
            "householdSpacesWithResidents",
            "vacantHouseholdSpaces",
            "householdSpacesThatAreSecondResidencesOrHolidayAccommodation",
            "householdSpacesInDetachedHousesOrBungalows",
            "householdSpacesInSemiDetachedHousesOrBungalows",
            "householdSpacesInTerracedHousesOrBungalows",
            "householdSpacesInPurposeBuiltBlocksOfFlats",
            "householdSpacesInConvertedOrSharedHouses",
            "householdSpacesInCommercialBuildings",
            "householdSpacesInCaravansOrOtherMobileOrTemporaryStructures",
        ])
        .build()
}

/// KS017: cars and vans.
fn ks017() -> TableSchema {
    Builder::table("KS017")
        .counts(&[
            "allHouseholds",
            "householdsWithNoCarOrVan",
            "householdsWithOneCarOrVan",
            "householdsWithTwoCarsOrVans",
            "householdsWithThreeCarsOrVans",
            "householdsWithFourOrMoreCarsOrVans",
            "allCarsOrVansInTheArea",
        ])
        .build()
}

/// KS018: tenure.
fn ks018() -> TableSchema {
    Builder::table("KS018")
        .counts(&[
            "allHouseholds",
            "householdsThatOwnOutright",
            "householdsThatOwnWithAMortgageOrLoan",
            "householdsInSharedOwnership",
            "householdsRentingFromTheCouncil",
            "householdsRentingFromAHousingAssociationOrRegisteredSocialLandlord",
            "householdsRentingFromAPrivateLandlordOrLettingAgency",
            "householdsRentingFromAnotherSource",
            "householdsLivingRentFree",
        ])
        .build()
}

/// KS019: rooms, amenities, central heating and lowest floor level.
fn ks019() -> TableSchema {
    Builder::table("KS019")
        .counts(&[
            "allHouseholds",
            "householdsWithAnOccupancyRatingOfMinus1OrLess",
            "householdsWithoutCentralHeating",
            "householdsWithoutSoleUseOfBathShowerOrToilet",
            "householdsWithLowestFloorLevelBasementOrSemiBasement",
            "householdsWithLowestFloorLevelFifthFloorOrHigher",
        ])
        .build()
}

/// KS020: household composition.
fn ks020() -> TableSchema {
    Builder::table("KS020")
        .counts(&[
            "allHouseholds",
            "onePersonPensionerHouseholds",
            "otherOnePersonHouseholds",
            "allPensionerFamilyHouseholds",
            "marriedCoupleHouseholdsWithNoChildren",
            "marriedCoupleHouseholdsWithDependentChildren",
            "marriedCoupleHouseholdsAllChildrenNonDependent",
            "cohabitingCoupleHouseholdsWithNoChildren",
            "cohabitingCoupleHouseholdsWithDependentChildren",
            "cohabitingCoupleHouseholdsAllChildrenNonDependent",
            "loneParentHouseholdsWithDependentChildren",
            "loneParentHouseholdsAllChildrenNonDependent",
            "otherHouseholdsWithDependentChildren",
            "otherAllStudentHouseholds",
            "otherAllPensionerHouseholds",
            "otherHouseholds",
        ])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::error::CensusError;
    use crate::schema::types::FieldValue;

    #[test]
    fn every_builtin_table_resolves_for_every_country() {
        for table in BUILTIN.tables() {
            for country in [
                Country::EnglandWales,
                Country::Scotland,
                Country::NorthernIreland,
            ] {
                assert!(
                    BUILTIN.resolve(table, country).is_ok(),
                    "{table} missing layout for {country}"
                );
            }
        }
    }

    #[test]
    fn unknown_tables_do_not_resolve() {
        let err = resolve("CAS999", "Scotland").unwrap_err();
        assert!(matches!(err, CensusError::UnknownSchema { .. }));
    }

    #[test]
    fn ks015_england_wales_sample_line() -> Result<()> {
        // the "5.0" cell below logs a coercion warning; surface it in test output
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);

        let schema = resolve("KS015", "England/Wales")?;
        let (zone, values) =
            schema.parse_line("'00AAFA0001,100,10,5,20,15,2,30,8,3,4,2,1,5.0,40,60")?;
        assert_eq!(zone.as_str(), "00AAFA0001");

        let get = |name: &str| values[schema.position(name).unwrap()];
        assert_eq!(get("peopleAged16to74InEmployment"), FieldValue::Count(100));
        assert_eq!(
            get("publicTransportUsersInHouseholdsWithoutACarOrVan"),
            FieldValue::Count(60)
        );
        // "5.0" is not an integer: the lenient policy coerces it to 0
        assert_eq!(
            get("averageDistanceInKmTravelledToFixedPlaceOfWork"),
            FieldValue::Count(0)
        );
        Ok(())
    }

    #[test]
    fn ks015_northern_ireland_has_no_underground_category() -> Result<()> {
        let ni = resolve("KS015", "Northern Ireland")?;
        assert_eq!(ni.fields().len(), 14);
        assert!(ni
            .position("travelToWorkByUndergroundMetroLightRailOrTram")
            .is_none());
        Ok(())
    }

    #[test]
    fn ks013_northern_ireland_sums_level_4_and_5_columns() -> Result<()> {
        let schema = resolve("KS013", "northern IRELAND")?;
        // 13 columns: zone, then 12 data columns; columns 6 and 7 are the
        // separately published level-4 and level-5 counts
        let (_, values) = schema.parse_line("'00AAFA0001,200,50,30,40,20,25,15,10,5,12,8,5")?;
        let level4and5 = values[schema
            .position("peopleAged16to74WithHighestQualificationAttainedLevel4and5")
            .unwrap()];
        assert_eq!(level4and5, FieldValue::Count(25 + 15));
        Ok(())
    }

    #[test]
    fn ks013_layouts_differ_per_country() -> Result<()> {
        let ew = resolve("KS013", "")?;
        let scot = resolve("KS013", "Scotland")?;
        let ni = resolve("KS013", "Northern Ireland")?;
        assert_eq!(ew.fields().len(), 7);
        assert_eq!(scot.fields().len(), 6);
        assert_eq!(ni.fields().len(), 11);
        assert_eq!(ni.expected_columns(), 13);
        Ok(())
    }

    #[test]
    fn geometry_table_parses_real_values() -> Result<()> {
        let schema = resolve("CASAreaEastingNorthing", "")?;
        let (_, values) = schema.parse_line("'00AAFA0001,12.5,430500.5,433999.25")?;
        assert_eq!(values[0], FieldValue::Measure(12.5));
        assert_eq!(values[2], FieldValue::Measure(433999.25));
        Ok(())
    }
}
