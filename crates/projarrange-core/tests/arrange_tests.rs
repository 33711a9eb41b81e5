//! End-to-end arrangement tests: parse project text, arrange, serialize.

use pretty_assertions::assert_eq;
use projarrange_core::xml::{parse, serialize_with, WriteOptions};
use projarrange_core::{arrange_document, arrange_str, ArrangeOptions, ArrangeSettings};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Arranges `xml` and returns it on one line without a declaration.
fn arrange(xml: &str, settings: &ArrangeSettings) -> String {
    init_logging();
    let mut doc = parse(xml).unwrap();
    arrange_document(&mut doc, settings).unwrap();
    serialize_with(
        &doc,
        WriteOptions {
            indent: None,
            declaration: false,
        },
    )
    .unwrap()
}

fn with_options(options: ArrangeOptions) -> ArrangeSettings {
    ArrangeSettings::new().with_options(options)
}

const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
  <ItemGroup>
    <Compile Include="Program.cs" />
    <Reference Include="System.Xml" />
    <Compile Include="Arrange.cs" />
    <Reference Include="System" />
  </ItemGroup>
  <PropertyGroup Condition=" '$(Configuration)' == 'Debug' ">
    <Optimize>false</Optimize>
    <DebugSymbols>true</DebugSymbols>
  </PropertyGroup>
  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <AssemblyName>Sample</AssemblyName>
  </PropertyGroup>
  <ItemGroup>
    <None Include="App.config" />
    <Compile Include="Properties\AssemblyInfo.cs" />
  </ItemGroup>
  <Target Name="AfterBuild">
    <Message Text="done" />
    <Copy SourceFiles="a" DestinationFolder="b" />
  </Target>
</Project>
"#;

#[test]
fn default_settings_sort_children_only() {
    insta::assert_snapshot!(
        arrange_str(PROJECT, &ArrangeSettings::new()).unwrap(),
        @r###"
    <?xml version="1.0" encoding="utf-8"?>
    <Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
      <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets"/>
      <ItemGroup>
        <Reference Include="System"/>
        <Reference Include="System.Xml"/>
        <Compile Include="Arrange.cs"/>
        <Compile Include="Program.cs"/>
      </ItemGroup>
      <PropertyGroup Condition=" '$(Configuration)' == 'Debug' ">
        <DebugSymbols>true</DebugSymbols>
        <Optimize>false</Optimize>
      </PropertyGroup>
      <PropertyGroup>
        <AssemblyName>Sample</AssemblyName>
        <OutputType>Exe</OutputType>
      </PropertyGroup>
      <ItemGroup>
        <Compile Include="Properties\AssemblyInfo.cs"/>
        <None Include="App.config"/>
      </ItemGroup>
      <Target Name="AfterBuild">
        <Message Text="done"/>
        <Copy SourceFiles="a" DestinationFolder="b"/>
      </Target>
    </Project>
    "###
    );
}

#[test]
fn all_options_normalize_whole_project() {
    insta::assert_snapshot!(
        arrange_str(PROJECT, &with_options(ArrangeOptions::ALL)).unwrap(),
        @r###"
    <?xml version="1.0" encoding="utf-8"?>
    <Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
      <PropertyGroup Condition=" '$(Configuration)' == 'Debug' ">
        <DebugSymbols>true</DebugSymbols>
        <Optimize>false</Optimize>
      </PropertyGroup>
      <PropertyGroup>
        <AssemblyName>Sample</AssemblyName>
        <OutputType>Exe</OutputType>
      </PropertyGroup>
      <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets"/>
      <ItemGroup>
        <Reference Include="System"/>
        <Reference Include="System.Xml"/>
      </ItemGroup>
      <ItemGroup>
        <Compile Include="Arrange.cs"/>
        <Compile Include="Program.cs"/>
        <Compile Include="Properties\AssemblyInfo.cs"/>
      </ItemGroup>
      <ItemGroup>
        <None Include="App.config"/>
      </ItemGroup>
      <Target Name="AfterBuild">
        <Message Text="done"/>
        <Copy SourceFiles="a" DestinationFolder="b"/>
      </Target>
    </Project>
    "###
    );
}

#[test]
fn children_sort_lexicographically_without_sticky_names() {
    let settings = ArrangeSettings::new().with_sticky_element_names(Vec::<String>::new());
    assert_eq!(
        arrange("<P><ItemGroup><B/><A/></ItemGroup></P>", &settings),
        "<P><ItemGroup><A/><B/></ItemGroup></P>"
    );
}

#[test]
fn identical_references_collapse_when_combining() {
    let result = arrange(
        r#"<P><Reference Include="X"><Private>true</Private></Reference><Reference Include="X"><HintPath>x.dll</HintPath></Reference></P>"#,
        &with_options(ArrangeOptions::COMBINE_ROOT_ELEMENTS),
    );
    assert_eq!(
        result,
        r#"<P><Reference Include="X"><HintPath>x.dll</HintPath><Private>true</Private></Reference></P>"#
    );
}

#[test]
fn differing_references_stay_apart_but_sort() {
    let result = arrange(
        r#"<P><ItemGroup><Reference Include="Y"/><Reference Include="X"/></ItemGroup></P>"#,
        &with_options(ArrangeOptions::COMBINE_ROOT_ELEMENTS),
    );
    assert_eq!(
        result,
        r#"<P><ItemGroup><Reference Include="X"/><Reference Include="Y"/></ItemGroup></P>"#
    );
}

#[test]
fn combined_children_keep_source_order_under_keep_order_parent() {
    let settings = with_options(ArrangeOptions::COMBINE_ROOT_ELEMENTS)
        .with_keep_order_element_names(["Target"]);
    let result = arrange(
        r#"<P><Target Name="t"><B/></Target><Other/><Target Name="t"><A/></Target></P>"#,
        &settings,
    );
    assert_eq!(result, r#"<P><Target Name="t"><B/><A/></Target><Other/></P>"#);
}

#[test]
fn split_yields_one_group_per_item_type() {
    let result = arrange(
        r#"<P><ItemGroup><Zed Include="z"/><Compile Include="c"/><Reference Include="r"/></ItemGroup></P>"#,
        &with_options(ArrangeOptions::SPLIT_ITEM_GROUPS),
    );
    assert_eq!(
        result,
        concat!(
            r#"<P><ItemGroup><Reference Include="r"/></ItemGroup>"#,
            r#"<ItemGroup><Compile Include="c"/></ItemGroup>"#,
            r#"<ItemGroup><Zed Include="z"/></ItemGroup></P>"#,
        )
    );
}

#[test]
fn split_leaves_comments_in_the_original_group() {
    let result = arrange(
        r#"<P><ItemGroup><!--refs--><Reference Include="r"/><None Include="n"/></ItemGroup></P>"#,
        &with_options(ArrangeOptions::SPLIT_ITEM_GROUPS),
    );
    assert_eq!(
        result,
        r#"<P><ItemGroup><!--refs--><Reference Include="r"/></ItemGroup><ItemGroup><None Include="n"/></ItemGroup></P>"#
    );
}

#[test]
fn option_sections_are_isolated_from_global_options() {
    let source = concat!(
        "<Project>",
        "<Target/><PropertyGroup/>",
        "<!-- Options: SortRootElements -->",
        "<Target/><ItemGroup/>",
        "<!-- /Options -->",
        "<ItemGroup/>",
        "</Project>",
    );

    assert_eq!(
        arrange(source, &ArrangeSettings::new()),
        concat!(
            "<Project>",
            "<Target/><PropertyGroup/><ItemGroup/>",
            "<!-- Options: SortRootElements -->",
            "<ItemGroup/><Target/>",
            "<!-- /Options -->",
            "</Project>",
        )
    );
}

#[test]
fn section_with_none_overrides_global_sort() {
    let source = "<Project><Target/><!--Options: None--><Target/><PropertyGroup/><!--/Options--><PropertyGroup/></Project>";
    assert_eq!(
        arrange(source, &with_options(ArrangeOptions::SORT_ROOT_ELEMENTS)),
        "<Project><PropertyGroup/><Target/><!--Options: None--><Target/><PropertyGroup/><!--/Options--></Project>"
    );
}

#[test]
fn unknown_marker_flag_is_an_ordinary_comment() {
    let source = "<Project><Target/><!--Options: SortEverything--><PropertyGroup/></Project>";
    assert_eq!(
        arrange(
            source,
            &with_options(ArrangeOptions::SORT_ROOT_ELEMENTS | ArrangeOptions::KEEP_COMMENT_WITH_NEXT)
        ),
        "<Project><!--Options: SortEverything--><PropertyGroup/><Target/></Project>"
    );
}

#[test]
fn unclosed_section_runs_to_the_end() {
    let source = "<Project><!--Options: SortRootElements--><Target/><PropertyGroup/></Project>";
    assert_eq!(
        arrange(source, &ArrangeSettings::new()),
        "<Project><!--Options: SortRootElements--><PropertyGroup/><Target/></Project>"
    );
}

#[test]
fn keep_order_elements_keep_their_children() {
    let settings = ArrangeSettings::new().with_keep_order_element_names(["DoNotSort"]);
    let result = arrange(
        "<Root><Sort><Z/><A/></Sort><DoNotSort><Z/><A/></DoNotSort></Root>",
        &settings,
    );
    assert_eq!(
        result,
        "<Root><Sort><A/><Z/></Sort><DoNotSort><Z/><A/></DoNotSort></Root>"
    );
}

#[test]
fn comments_follow_their_element_when_sorting_root() {
    let source = concat!(
        "<Project>",
        "<!--build--><Target Name=\"Build\"/>",
        "<!--items--><!--more--><ItemGroup/>",
        "<!--props--><PropertyGroup/>",
        "<!--end-->",
        "</Project>",
    );
    let result = arrange(
        source,
        &with_options(ArrangeOptions::SORT_ROOT_ELEMENTS | ArrangeOptions::KEEP_COMMENT_WITH_NEXT),
    );
    assert_eq!(
        result,
        concat!(
            "<Project>",
            "<!--props--><PropertyGroup/>",
            "<!--items--><!--more--><ItemGroup/>",
            "<!--build--><Target Name=\"Build\"/>",
            "<!--end-->",
            "</Project>",
        )
    );
}

#[test]
fn imports_stay_with_next_element() {
    let source = concat!(
        "<Project>",
        "<Target Name=\"Build\"/>",
        "<Import Project=\"props\"/><PropertyGroup/>",
        "</Project>",
    );
    let result = arrange(
        source,
        &with_options(ArrangeOptions::SORT_ROOT_ELEMENTS | ArrangeOptions::KEEP_IMPORT_WITH_NEXT),
    );
    assert_eq!(
        result,
        "<Project><Import Project=\"props\"/><PropertyGroup/><Target Name=\"Build\"/></Project>"
    );
}

#[test]
fn sort_attributes_break_ties_in_order() {
    let settings = ArrangeSettings::new().with_sort_attributes(["Include", "Condition"]);
    let result = arrange(
        r#"<P><ItemGroup><C Include="a" Condition="2"/><C Include="a" Condition="1"/><C Include="0"/></ItemGroup></P>"#,
        &settings,
    );
    assert_eq!(
        result,
        r#"<P><ItemGroup><C Include="0"/><C Include="a" Condition="1"/><C Include="a" Condition="2"/></ItemGroup></P>"#
    );
}

#[test]
fn equal_keys_keep_source_order() {
    let result = arrange(
        r#"<P><ItemGroup><C Include="a" Tag="1"/><C Include="a" Tag="2"/><C Include="a" Tag="0"/></ItemGroup></P>"#,
        &ArrangeSettings::new(),
    );
    assert_eq!(
        result,
        r#"<P><ItemGroup><C Include="a" Tag="1"/><C Include="a" Tag="2"/><C Include="a" Tag="0"/></ItemGroup></P>"#
    );
}

#[test]
fn settings_load_from_json() {
    let settings = ArrangeSettings::from_json_str(
        r#"{ "stickyElementNames": ["Zed", "[Default]"], "options": "NoRoot" }"#,
    )
    .unwrap();
    let result = arrange(
        "<P><ItemGroup><Compile Include=\"c\"/><Zed/></ItemGroup></P>",
        &settings,
    );
    assert_eq!(
        result,
        "<P><ItemGroup><Zed/></ItemGroup><ItemGroup><Compile Include=\"c\"/></ItemGroup></P>"
    );
}

#[test]
fn prolog_and_epilog_comments_survive() {
    let result = arrange_str("<!--head--><P><B/><A/></P><!--tail-->", &ArrangeSettings::new()).unwrap();
    assert!(result.contains("<!--head-->"));
    assert!(result.trim_end().ends_with("<!--tail-->"));
}

#[test]
fn malformed_document_is_rejected() {
    assert!(arrange_str("<P><A></P>", &ArrangeSettings::new()).is_err());
}
